//! Integration tests for the submission lifecycle.
//!
//! Covers the happy paths and the state-machine guards of:
//! - createSubmission
//! - updateSubmission (plain updates and dispatch)
//! - autoFillPlacesInformation
//! - approveSubmission
//! - deleteSubmission

mod common;

use crate::common::*;
use chrono::Timelike;
use directory_core::common::ErrorCode;
use directory_core::domains::audit::{AuditAction, AuditObjectType};
use directory_core::domains::submissions::activities::{
    approve_submission, autofill_places_information, delete_submission, get_submission,
    get_submissions, update_submission,
};
use directory_core::domains::submissions::models::HealthcareProfessionalDraft;
use directory_core::domains::submissions::{
    SubmissionError, SubmissionFilter, SubmissionStatus, UpdateSubmissionInput,
};
use directory_core::kernel::{MockPlaceLookup, TestDependencies};
use test_context::test_context;

// =============================================================================
// Create
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn created_submission_is_pending_with_latch_off(ctx: &TestHarness) {
    let submission = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;

    assert_eq!(submission.status, SubmissionStatus::Pending);
    assert!(!submission.autofill_place_from_submission_url);
    assert_eq!(submission.facility_draft, None);
    assert_eq!(submission.healthcare_professional_drafts, None);
    assert_eq!(submission.facility_id, None);
    assert_eq!(submission.healthcare_professional_id, None);
    assert_eq!(ctx.doubles.submissions.get(submission.id), Some(submission.clone()));
    // Postgres keeps microseconds; anything finer would not survive a reload.
    assert_eq!(submission.created_date.nanosecond() % 1_000, 0);
    assert_eq!(submission.updated_date.nanosecond() % 1_000, 0);

    let entries = ctx.doubles.audit_log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::Create);
    assert_eq!(entries[0].object_type, AuditObjectType::Submission);
    assert_eq!(entries[0].actor_id, ctx.actor);
    assert_eq!(entries[0].old_value, None);
    assert!(entries[0].new_value.is_some());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn invalid_create_writes_nothing(ctx: &TestHarness) {
    let mut input = jane_doe();
    input.google_maps_url = String::new();

    let error = directory_core::domains::submissions::activities::create_submission(
        input,
        ctx.actor,
        &ctx.deps,
    )
    .await
    .unwrap_err();

    assert_eq!(error.error_code(), Some(ErrorCode::Required));
    assert!(ctx.doubles.submissions.is_empty());
    assert!(ctx.doubles.audit_log.entries().is_empty());
}

// =============================================================================
// Reads
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn get_submission_reports_bad_and_missing_ids(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;

    let found = get_submission(created.id.to_string(), &ctx.deps).await.unwrap();
    assert_eq!(found, created);

    let malformed = get_submission("nope".to_string(), &ctx.deps).await.unwrap_err();
    assert_eq!(malformed.error_code(), Some(ErrorCode::InvalidId));

    let missing = get_submission(uuid::Uuid::now_v7().to_string(), &ctx.deps)
        .await
        .unwrap_err();
    assert_eq!(missing.error_code(), Some(ErrorCode::NotFound));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn list_filters_by_status(ctx: &TestHarness) {
    let first = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;
    let second = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;
    update_ok(
        &second,
        UpdateSubmissionInput::builder().is_rejected(true).build(),
        ctx.actor,
        &ctx.deps,
    )
    .await;

    let pending = get_submissions(
        SubmissionFilter::new(Some(SubmissionStatus::Pending), None, None),
        &ctx.deps,
    )
    .await
    .unwrap();
    assert_eq!(pending.iter().map(|s| s.id).collect::<Vec<_>>(), vec![first.id]);

    let all = get_submissions(SubmissionFilter::default(), &ctx.deps)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

// =============================================================================
// Update
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn plain_update_keeps_untouched_fields(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;

    let updated = update_ok(
        &created,
        UpdateSubmissionInput::builder()
            .notes("Open on Saturdays")
            .is_under_review(true)
            .build(),
        ctx.actor,
        &ctx.deps,
    )
    .await;

    assert_eq!(updated.notes, "Open on Saturdays");
    assert_eq!(updated.status, SubmissionStatus::UnderReview);
    assert_eq!(updated.google_maps_url, created.google_maps_url);
    assert_eq!(updated.healthcare_professional_name, "Jane Doe");
    assert_eq!(updated.spoken_languages, vec!["en".to_string()]);
    assert!(updated.updated_date >= created.updated_date);

    let entries = ctx.doubles.audit_log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].action, AuditAction::Update);
    assert!(entries[1].old_value.is_some());
    assert!(entries[1].new_value.is_some());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn conflicting_flags_are_rejected_without_mutation(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;

    let error = update_submission(
        created.id.to_string(),
        UpdateSubmissionInput::builder()
            .is_under_review(true)
            .is_rejected(true)
            .notes("should not land")
            .build(),
        ctx.actor,
        &ctx.deps,
    )
    .await
    .unwrap_err();

    assert_eq!(error.error_code(), Some(ErrorCode::InvalidInput));
    assert_eq!(error.http_status(), 400);
    assert_eq!(ctx.doubles.submissions.get(created.id), Some(created));
    assert_eq!(ctx.doubles.audit_log.entries().len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn false_approval_flag_is_a_plain_update(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;

    let updated = update_ok(
        &created,
        UpdateSubmissionInput::builder()
            .is_approved(false)
            .notes("reviewed")
            .build(),
        ctx.actor,
        &ctx.deps,
    )
    .await;

    assert_eq!(updated.status, SubmissionStatus::Pending);
    assert_eq!(updated.notes, "reviewed");
    assert_eq!(ctx.doubles.facilities.count(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn update_of_missing_submission_is_not_found(ctx: &TestHarness) {
    let error = update_submission(
        uuid::Uuid::now_v7().to_string(),
        UpdateSubmissionInput::builder().notes("x").build(),
        ctx.actor,
        &ctx.deps,
    )
    .await
    .unwrap_err();

    assert!(matches!(error, SubmissionError::NotFound(_)));
    assert_eq!(error.http_status(), 404);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rejection_can_be_repeated(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;
    let reject = || UpdateSubmissionInput::builder().is_rejected(true).build();

    update_ok(&created, reject(), ctx.actor, &ctx.deps).await;
    let again = update_ok(&created, reject(), ctx.actor, &ctx.deps).await;

    assert_eq!(again.status, SubmissionStatus::Rejected);
}

// =============================================================================
// Autofill
// =============================================================================

#[tokio::test]
async fn autofill_fills_draft_and_moves_to_under_review() {
    let ctx = TestHarness::with_doubles(
        TestDependencies::new().mock_place_lookup(MockPlaceLookup::new().with_place(aoba_clinic())),
    );
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;

    let updated = update_ok(
        &created,
        UpdateSubmissionInput::builder()
            .autofill_place_from_submission_url(true)
            .build(),
        ctx.actor,
        &ctx.deps,
    )
    .await;

    assert_eq!(updated.status, SubmissionStatus::UnderReview);
    assert!(updated.autofill_place_from_submission_url);
    assert_eq!(updated.google_maps_url, "https://maps.google.com/?cid=42");
    let draft = updated.facility_draft.expect("facility draft");
    assert_eq!(draft.name_en.as_deref(), Some("Aoba Clinic"));
    assert_eq!(draft.name_ja.as_deref(), Some("青葉クリニック"));
    assert_eq!(draft.map_latitude, Some(35.67));
    assert_eq!(ctx.doubles.place_lookup.calls(), vec![MAPS_URL.to_string()]);
}

#[tokio::test]
async fn autofill_latch_is_one_way() {
    let ctx = TestHarness::with_doubles(
        TestDependencies::new().mock_place_lookup(
            MockPlaceLookup::new()
                .with_place(aoba_clinic())
                .with_place(aoba_clinic()),
        ),
    );
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;
    let autofill = || {
        UpdateSubmissionInput::builder()
            .autofill_place_from_submission_url(true)
            .build()
    };
    let filled = update_ok(&created, autofill(), ctx.actor, &ctx.deps).await;

    let error = update_submission(created.id.to_string(), autofill(), ctx.actor, &ctx.deps)
        .await
        .unwrap_err();

    assert_eq!(error.error_code(), Some(ErrorCode::AutofillFailure));
    assert_eq!(ctx.doubles.submissions.get(created.id), Some(filled));
    assert_eq!(ctx.doubles.place_lookup.calls().len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn autofill_without_a_place_changes_nothing(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;

    let error =
        autofill_places_information(created.id.to_string(), MAPS_URL.to_string(), ctx.actor, &ctx.deps)
            .await
            .unwrap_err();

    assert_eq!(error.error_code(), Some(ErrorCode::AutofillFailure));
    assert_eq!(ctx.doubles.submissions.get(created.id), Some(created));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn autofill_with_blank_url_fails(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;

    let error =
        autofill_places_information(created.id.to_string(), "  ".to_string(), ctx.actor, &ctx.deps)
            .await
            .unwrap_err();

    assert_eq!(error.error_code(), Some(ErrorCode::AutofillFailure));
    assert!(ctx.doubles.place_lookup.calls().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn failing_lookup_is_an_autofill_failure(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;
    ctx.doubles.place_lookup.set_failing(true);

    let error =
        autofill_places_information(created.id.to_string(), MAPS_URL.to_string(), ctx.actor, &ctx.deps)
            .await
            .unwrap_err();

    assert_eq!(error.error_code(), Some(ErrorCode::AutofillFailure));
    assert_eq!(ctx.doubles.submissions.get(created.id), Some(created));
}

// =============================================================================
// Approve
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn approving_jane_doe_without_drafts(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;

    let approved = update_ok(
        &created,
        UpdateSubmissionInput::builder().is_approved(true).build(),
        ctx.actor,
        &ctx.deps,
    )
    .await;

    assert_eq!(approved.status, SubmissionStatus::Approved);

    let facility_id = approved.facility_id.expect("facility linked");
    let facility = ctx.doubles.facilities.get(facility_id).expect("facility exists");
    assert_eq!(facility.name_en, "Unknown Facility");
    assert_eq!(facility.name_ja, "Unknown Facility");
    assert_eq!(facility.contact.google_maps_url, MAPS_URL);
    assert_eq!(facility.map_latitude, 0.0);

    let professional_id = approved
        .healthcare_professional_id
        .expect("professional linked");
    let professional = ctx
        .doubles
        .healthcare_professionals
        .get(professional_id)
        .expect("professional exists");
    assert_eq!(professional.names[0].first_name, "Jane");
    assert_eq!(professional.names[0].last_name, "Doe");
    assert_eq!(professional.spoken_languages, vec!["en".to_string()]);
    assert_eq!(professional.facility_ids, vec![facility_id]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn approval_audits_what_it_creates(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;

    let approved = approve_submission(created.id.to_string(), ctx.actor, &ctx.deps)
        .await
        .unwrap();

    let entries = ctx.doubles.audit_log.entries();
    let kinds: Vec<_> = entries
        .iter()
        .map(|entry| (entry.action, entry.object_type))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (AuditAction::Create, AuditObjectType::Submission),
            (AuditAction::Create, AuditObjectType::Facility),
            (AuditAction::Create, AuditObjectType::HealthcareProfessional),
            (AuditAction::Update, AuditObjectType::Submission),
        ]
    );

    let facility_id = approved.facility_id.unwrap().to_string();
    assert_eq!(entries[1].old_value, None);
    assert_eq!(
        entries[1].new_value.as_ref().map(|value| value["id"].clone()),
        Some(serde_json::Value::String(facility_id))
    );
    assert!(entries[2].new_value.is_some());
    assert!(entries.iter().all(|entry| entry.actor_id == ctx.actor));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn second_approval_is_rejected_without_side_effects(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;
    let approved = approve_submission(created.id.to_string(), ctx.actor, &ctx.deps)
        .await
        .unwrap();
    let audit_count = ctx.doubles.audit_log.entries().len();

    let error = approve_submission(created.id.to_string(), ctx.actor, &ctx.deps)
        .await
        .unwrap_err();

    assert_eq!(error.error_code(), Some(ErrorCode::SubmissionAlreadyApproved));
    assert_eq!(ctx.doubles.submissions.get(created.id), Some(approved));
    assert_eq!(ctx.doubles.facilities.count(), 1);
    assert_eq!(ctx.doubles.healthcare_professionals.count(), 1);
    assert_eq!(ctx.doubles.audit_log.entries().len(), audit_count);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn approval_reuses_linked_entities(ctx: &TestHarness) {
    let facility_id = ctx.doubles.facilities.seed(existing_facility());
    let professional_id = ctx
        .doubles
        .healthcare_professionals
        .seed(existing_professional(facility_id));

    let mut submission = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;
    submission.facility_id = Some(facility_id);
    submission.healthcare_professional_id = Some(professional_id);
    ctx.doubles.submissions.seed(submission.clone());

    let approved = approve_submission(submission.id.to_string(), ctx.actor, &ctx.deps)
        .await
        .unwrap();

    assert_eq!(approved.facility_id, Some(facility_id));
    assert_eq!(approved.healthcare_professional_id, Some(professional_id));
    assert!(ctx.doubles.facilities.created().is_empty());
    assert!(ctx.doubles.healthcare_professionals.created().is_empty());

    let entries = ctx.doubles.audit_log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].action, AuditAction::Update);
    assert_eq!(entries[1].object_type, AuditObjectType::Submission);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn approval_uses_the_autofilled_facility_draft(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;
    let mut submission = created.clone();
    submission.facility_draft = Some(
        directory_core::domains::submissions::activities::facility_draft_from_place(&aoba_clinic()),
    );
    ctx.doubles.submissions.seed(submission);

    let approved = approve_submission(created.id.to_string(), ctx.actor, &ctx.deps)
        .await
        .unwrap();

    let facility = ctx
        .doubles
        .facilities
        .get(approved.facility_id.unwrap())
        .unwrap();
    assert_eq!(facility.name_en, "Aoba Clinic");
    assert_eq!(facility.contact.google_maps_url, "https://maps.google.com/?cid=42");
    assert_eq!(facility.contact.address.city_en, "Shibuya");
    assert_eq!(facility.map_longitude, 139.70);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn professional_draft_names_are_used(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;
    let draft = HealthcareProfessionalDraft {
        names: Some(existing_professional(directory_core::common::FacilityId::new()).names),
        specialties: Some(vec!["Internal Medicine".to_string()]),
        ..Default::default()
    };
    let mut submission = created.clone();
    submission.healthcare_professional_drafts = Some(vec![draft]);
    ctx.doubles.submissions.seed(submission);

    let approved = approve_submission(created.id.to_string(), ctx.actor, &ctx.deps)
        .await
        .unwrap();

    let professional = ctx
        .doubles
        .healthcare_professionals
        .get(approved.healthcare_professional_id.unwrap())
        .unwrap();
    assert_eq!(professional.names[0].first_name, "Taro");
    assert_eq!(professional.specialties, vec!["Internal Medicine".to_string()]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn professional_failure_does_not_block_approval(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;
    ctx.doubles.healthcare_professionals.fail_creates(true);

    let approved = approve_submission(created.id.to_string(), ctx.actor, &ctx.deps)
        .await
        .unwrap();

    assert_eq!(approved.status, SubmissionStatus::Approved);
    assert!(approved.facility_id.is_some());
    assert_eq!(approved.healthcare_professional_id, None);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn blank_name_approves_without_professional(ctx: &TestHarness) {
    let mut input = jane_doe();
    input.healthcare_professional_name = String::new();
    let created = create_pending(input, ctx.actor, &ctx.deps).await;

    let approved = approve_submission(created.id.to_string(), ctx.actor, &ctx.deps)
        .await
        .unwrap();

    assert_eq!(approved.healthcare_professional_id, None);
    assert_eq!(ctx.doubles.healthcare_professionals.count(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn facility_failure_is_internal_error_and_leaves_row_alone(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;
    ctx.doubles.facilities.fail_creates(true);

    let error = approve_submission(created.id.to_string(), ctx.actor, &ctx.deps)
        .await
        .unwrap_err();

    assert_eq!(error.error_code(), Some(ErrorCode::InternalServerError));
    assert_eq!(error.http_status(), 500);
    assert_eq!(ctx.doubles.submissions.get(created.id), Some(created));
    assert_eq!(ctx.doubles.healthcare_professionals.count(), 0);
}

// =============================================================================
// Delete
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn deleting_twice_reports_invalid_id(ctx: &TestHarness) {
    let created = create_pending(jane_doe(), ctx.actor, &ctx.deps).await;

    let deleted = delete_submission(created.id.to_string(), ctx.actor, &ctx.deps)
        .await
        .unwrap();
    assert_eq!(deleted, created);
    assert!(ctx.doubles.submissions.get(created.id).is_none());

    let error = delete_submission(created.id.to_string(), ctx.actor, &ctx.deps)
        .await
        .unwrap_err();
    assert_eq!(error.error_code(), Some(ErrorCode::InvalidId));
    assert_eq!(error.http_status(), 404);

    let entries = ctx.doubles.audit_log.entries();
    assert_eq!(entries.last().map(|e| e.action), Some(AuditAction::Delete));
    assert!(entries.last().unwrap().new_value.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn overlong_id_is_invalid(ctx: &TestHarness) {
    let error = delete_submission("9".repeat(500), ctx.actor, &ctx.deps)
        .await
        .unwrap_err();

    assert!(matches!(error, SubmissionError::InvalidId(_)));
}
