// TestDependencies - in-memory collaborators for testing
//
// Provides doubles that can be injected into ServerDeps so the lifecycle
// engine runs without a database. Every double records what happened to it
// and can be told to fail.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{
    BaseAuditRecorder, BaseFacilityService, BaseHealthcareProfessionalService, BasePlaceLookup,
    BaseSubmissionStore, PlaceDetails, ServerDeps,
};
use crate::common::{now_micros, FacilityId, HealthcareProfessionalId, SubmissionId, UserId};
use crate::domains::audit::NewAuditLogEntry;
use crate::domains::facilities::{CreateFacility, Facility};
use crate::domains::healthcare_professionals::{
    CreateHealthcareProfessional, HealthcareProfessional,
};
use crate::domains::submissions::models::{
    NewSubmission, Submission, SubmissionFilter, SubmissionPatch,
};

// =============================================================================
// In-memory Submission Store
// =============================================================================

pub struct InMemorySubmissionStore {
    rows: Arc<Mutex<HashMap<SubmissionId, Submission>>>,
    fail_patch: AtomicBool,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
            fail_patch: AtomicBool::new(false),
        }
    }

    /// Put a row in place as-is
    pub fn seed(&self, submission: Submission) {
        self.rows
            .lock()
            .unwrap()
            .insert(submission.id, submission);
    }

    /// Current state of a row, bypassing the trait
    pub fn get(&self, id: SubmissionId) -> Option<Submission> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every following patch fail
    pub fn fail_patches(&self, fail: bool) {
        self.fail_patch.store(fail, Ordering::SeqCst);
    }
}

impl Default for InMemorySubmissionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSubmissionStore for InMemorySubmissionStore {
    async fn find_by_id(&self, id: SubmissionId) -> Result<Option<Submission>> {
        Ok(self.get(id))
    }

    async fn insert(&self, submission: NewSubmission) -> Result<Submission> {
        let submission = submission.into_submission(SubmissionId::new());
        self.seed(submission.clone());
        Ok(submission)
    }

    async fn insert_snapshot(&self, snapshot: &Submission) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&snapshot.id) {
            anyhow::bail!("Submission {} already exists", snapshot.id);
        }
        rows.insert(snapshot.id, snapshot.clone());
        Ok(())
    }

    async fn patch(&self, id: SubmissionId, patch: &SubmissionPatch) -> Result<()> {
        if self.fail_patch.load(Ordering::SeqCst) {
            anyhow::bail!("Submission store unavailable");
        }
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&id) else {
            anyhow::bail!("Submission {} not found for update", id);
        };
        row.apply(patch);
        Ok(())
    }

    async fn delete(&self, id: SubmissionId) -> Result<()> {
        self.rows.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn list(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>> {
        let mut rows: Vec<Submission> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|s| filter.status.map_or(true, |status| s.status == status))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_date.cmp(&a.created_date));

        Ok(rows
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }
}

// =============================================================================
// Mock Facility Service
// =============================================================================

pub struct MockFacilityService {
    facilities: Arc<Mutex<HashMap<FacilityId, Facility>>>,
    created: Arc<Mutex<Vec<Facility>>>,
    fail_create: AtomicBool,
}

impl MockFacilityService {
    pub fn new() -> Self {
        Self {
            facilities: Arc::new(Mutex::new(HashMap::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            fail_create: AtomicBool::new(false),
        }
    }

    /// Add a pre-existing facility and return its id
    pub fn seed(&self, input: CreateFacility) -> FacilityId {
        let facility = input.into_facility(FacilityId::new(), now_micros());
        let id = facility.id;
        self.facilities.lock().unwrap().insert(id, facility);
        id
    }

    pub fn get(&self, id: FacilityId) -> Option<Facility> {
        self.facilities.lock().unwrap().get(&id).cloned()
    }

    pub fn count(&self) -> usize {
        self.facilities.lock().unwrap().len()
    }

    /// Every facility created through the trait, including deleted ones
    pub fn created(&self) -> Vec<Facility> {
        self.created.lock().unwrap().clone()
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockFacilityService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseFacilityService for MockFacilityService {
    async fn create(&self, input: CreateFacility, _actor: UserId) -> Result<Facility> {
        if self.fail_create.load(Ordering::SeqCst) {
            anyhow::bail!("Facility store unavailable");
        }
        input.validate()?;

        let facility = input.into_facility(FacilityId::new(), now_micros());
        self.created.lock().unwrap().push(facility.clone());
        self.facilities
            .lock()
            .unwrap()
            .insert(facility.id, facility.clone());
        Ok(facility)
    }

    async fn delete(&self, id: FacilityId) -> Result<()> {
        self.facilities.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn find_by_id(&self, id: FacilityId) -> Result<Option<Facility>> {
        Ok(self.get(id))
    }
}

// =============================================================================
// Mock Healthcare Professional Service
// =============================================================================

pub struct MockHealthcareProfessionalService {
    professionals: Arc<Mutex<HashMap<HealthcareProfessionalId, HealthcareProfessional>>>,
    created: Arc<Mutex<Vec<HealthcareProfessional>>>,
    fail_create: AtomicBool,
}

impl MockHealthcareProfessionalService {
    pub fn new() -> Self {
        Self {
            professionals: Arc::new(Mutex::new(HashMap::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            fail_create: AtomicBool::new(false),
        }
    }

    /// Add a pre-existing professional and return its id
    pub fn seed(&self, input: CreateHealthcareProfessional) -> HealthcareProfessionalId {
        let professional =
            input.into_healthcare_professional(HealthcareProfessionalId::new(), now_micros());
        let id = professional.id;
        self.professionals.lock().unwrap().insert(id, professional);
        id
    }

    pub fn get(&self, id: HealthcareProfessionalId) -> Option<HealthcareProfessional> {
        self.professionals.lock().unwrap().get(&id).cloned()
    }

    pub fn count(&self) -> usize {
        self.professionals.lock().unwrap().len()
    }

    /// Every professional created through the trait, including deleted ones
    pub fn created(&self) -> Vec<HealthcareProfessional> {
        self.created.lock().unwrap().clone()
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockHealthcareProfessionalService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseHealthcareProfessionalService for MockHealthcareProfessionalService {
    async fn create(
        &self,
        input: CreateHealthcareProfessional,
        _actor: UserId,
    ) -> Result<HealthcareProfessional> {
        if self.fail_create.load(Ordering::SeqCst) {
            anyhow::bail!("Healthcare professional store unavailable");
        }
        input.validate()?;

        let professional =
            input.into_healthcare_professional(HealthcareProfessionalId::new(), now_micros());
        self.created.lock().unwrap().push(professional.clone());
        self.professionals
            .lock()
            .unwrap()
            .insert(professional.id, professional.clone());
        Ok(professional)
    }

    async fn delete(&self, id: HealthcareProfessionalId) -> Result<()> {
        self.professionals.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: HealthcareProfessionalId,
    ) -> Result<Option<HealthcareProfessional>> {
        Ok(self.get(id))
    }
}

// =============================================================================
// Mock Audit Recorder
// =============================================================================

pub struct MockAuditRecorder {
    entries: Arc<Mutex<Vec<NewAuditLogEntry>>>,
    fail: AtomicBool,
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
}

impl MockAuditRecorder {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            fail: AtomicBool::new(false),
            delay: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Make every following write wait this long before it lands
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Writes currently waiting out their delay
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Recorder whose every write fails
    pub fn failing() -> Self {
        let recorder = Self::new();
        recorder.set_failing(true);
        recorder
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Every entry recorded so far, oldest first
    pub fn entries(&self) -> Vec<NewAuditLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl Default for MockAuditRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAuditRecorder for MockAuditRecorder {
    async fn record(&self, entry: NewAuditLogEntry) -> Result<()> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("Audit log unavailable");
        }
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

// =============================================================================
// Mock Place Lookup
// =============================================================================

pub struct MockPlaceLookup {
    responses: Arc<Mutex<Vec<Option<PlaceDetails>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    fail: AtomicBool,
}

impl MockPlaceLookup {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: AtomicBool::new(false),
        }
    }

    /// Queue a place to be returned by the next lookup
    pub fn with_place(self, details: PlaceDetails) -> Self {
        self.responses.lock().unwrap().push(Some(details));
        self
    }

    /// Make every lookup error out
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// URLs passed to lookup, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockPlaceLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePlaceLookup for MockPlaceLookup {
    async fn lookup(&self, google_maps_url: &str) -> Result<Option<PlaceDetails>> {
        self.calls.lock().unwrap().push(google_maps_url.to_string());

        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("Places API unavailable");
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Nothing queued: the place could not be found
            Ok(None)
        } else {
            Ok(responses.remove(0))
        }
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub submissions: Arc<InMemorySubmissionStore>,
    pub facilities: Arc<MockFacilityService>,
    pub healthcare_professionals: Arc<MockHealthcareProfessionalService>,
    pub audit_log: Arc<MockAuditRecorder>,
    pub place_lookup: Arc<MockPlaceLookup>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            submissions: Arc::new(InMemorySubmissionStore::new()),
            facilities: Arc::new(MockFacilityService::new()),
            healthcare_professionals: Arc::new(MockHealthcareProfessionalService::new()),
            audit_log: Arc::new(MockAuditRecorder::new()),
            place_lookup: Arc::new(MockPlaceLookup::new()),
        }
    }

    /// Set a mock place lookup
    pub fn mock_place_lookup(mut self, lookup: MockPlaceLookup) -> Self {
        self.place_lookup = Arc::new(lookup);
        self
    }

    /// Set a mock audit recorder
    pub fn mock_audit_log(mut self, recorder: MockAuditRecorder) -> Self {
        self.audit_log = Arc::new(recorder);
        self
    }

    /// Convert into ServerDeps sharing these doubles
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.submissions.clone(),
            self.facilities.clone(),
            self.healthcare_professionals.clone(),
            self.audit_log.clone(),
            self.place_lookup.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
