//! Streaming analysis pipeline
//!
//! Each call to [`StreamingAnalyzer::analyze`] starts one background run and
//! hands back the receiving end of a bounded update stream. Starting a new
//! run cancels the previous one.
//!
//! ```text
//! tokenize (0.10) → entities (0.30) → relationships (0.50)
//!   → typed holes (0.70) → dependencies (0.85) → triples (0.95) → complete (1.00)
//! ```
//!
//! Stage and per-item updates are best effort and dropped when the stream is
//! full. The completion update waits for room, so a consumer that drains the
//! stream always sees it.

use crate::config::AnalyzerConfig;
use crate::mining::{extract_relationships, generate_triples};
use quarry_domain::{Analysis, AnalysisUpdate, UpdatePayload};
use quarry_extractor::{
    extract_dependencies, extract_typed_holes, scan, EntityExtractor, ExtractorError,
    PatternExtractor,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const TOKENIZE_PROGRESS: f32 = 0.10;
const ENTITY_PROGRESS: f32 = 0.30;
const RELATIONSHIP_PROGRESS: f32 = 0.50;
const HOLE_PROGRESS: f32 = 0.70;
const DEPENDENCY_PROGRESS: f32 = 0.85;
const TRIPLE_PROGRESS: f32 = 0.95;

/// Lifecycle of the most recent run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// No run has started
    Idle,
    /// A run is in progress
    Running,
    /// The last run delivered its completion update
    Completed,
    /// The last run was stopped or superseded before completing
    Cancelled,
}

/// State shared between the analyzer handle and its run task
struct Shared {
    analysis: Analysis,
    state: RunState,
    cancel: Option<CancellationToken>,
    generation: u64,
}

/// Runs the analysis pipeline in the background, one run at a time
///
/// # Examples
///
/// ```
/// use quarry_analyzer::StreamingAnalyzer;
///
/// # #[tokio::main]
/// # async fn main() {
/// let analyzer = StreamingAnalyzer::new();
/// let mut updates = analyzer.analyze("User creates Document").await;
///
/// let mut last = 0.0;
/// while let Some(update) = updates.recv().await {
///     last = update.progress;
/// }
/// assert_eq!(last, 1.0);
///
/// let analysis = analyzer.results().await;
/// assert_eq!(analysis.triples.len(), 1);
/// # }
/// ```
pub struct StreamingAnalyzer {
    shared: Arc<RwLock<Shared>>,
    extractor: Arc<dyn EntityExtractor>,
    config: AnalyzerConfig,
}

impl StreamingAnalyzer {
    /// Analyzer using the pattern strategy and default settings
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    /// Analyzer using the pattern strategy and `config`
    pub fn with_config(config: AnalyzerConfig) -> Self {
        let extractor = PatternExtractor::new().with_max_span(config.max_multiword_span);
        Self::build(Arc::new(extractor), config)
    }

    /// Analyzer using `extractor` for the entity stage
    pub fn with_extractor(extractor: Arc<dyn EntityExtractor>) -> Self {
        Self::build(extractor, AnalyzerConfig::default())
    }

    /// Analyzer using `extractor` and `config`
    pub fn with_extractor_and_config(
        extractor: Arc<dyn EntityExtractor>,
        config: AnalyzerConfig,
    ) -> Self {
        Self::build(extractor, config)
    }

    fn build(extractor: Arc<dyn EntityExtractor>, config: AnalyzerConfig) -> Self {
        Self {
            shared: Arc::new(RwLock::new(Shared {
                analysis: Analysis::default(),
                state: RunState::Idle,
                cancel: None,
                generation: 0,
            })),
            extractor,
            config,
        }
    }

    /// Start analyzing `content`, cancelling any run in progress
    ///
    /// Returns immediately with the run's update stream. The stream closes
    /// when the run finishes or is cancelled; only a run that finishes
    /// delivers a completion update.
    pub async fn analyze(&self, content: impl Into<String>) -> mpsc::Receiver<AnalysisUpdate> {
        let content = content.into();
        let (tx, rx) = mpsc::channel(self.config.update_capacity.max(1));
        let cancel = CancellationToken::new();

        let generation = {
            let mut shared = self.shared.write().await;
            if let Some(previous) = shared.cancel.take() {
                if shared.state == RunState::Running {
                    debug!("Superseding run {}", shared.generation);
                }
                previous.cancel();
            }

            shared.generation += 1;
            shared.cancel = Some(cancel.clone());
            shared.analysis = Analysis::new(content.clone());
            shared.state = RunState::Running;
            shared.generation
        };

        info!("Starting analysis run {} ({} bytes)", generation, content.len());

        let run = Run {
            shared: Arc::clone(&self.shared),
            extractor: Arc::clone(&self.extractor),
            categories: self.config.entity_categories.clone(),
            cancel,
            generation,
            tx,
        };

        tokio::spawn(async move {
            let completed = run.execute(&content).await;
            run.finish(completed).await;
        });

        rx
    }

    /// Cancel the active run, if any; safe to call when idle
    pub async fn stop(&self) {
        let shared = self.shared.read().await;
        if let Some(cancel) = &shared.cancel {
            cancel.cancel();
        }
    }

    /// Snapshot of the current, possibly partial, analysis
    pub async fn results(&self) -> Analysis {
        self.shared.read().await.analysis.clone()
    }

    /// Whether a run is in progress
    pub async fn is_running(&self) -> bool {
        self.shared.read().await.state == RunState::Running
    }

    /// Lifecycle state of the most recent run
    pub async fn state(&self) -> RunState {
        self.shared.read().await.state
    }
}

impl Default for StreamingAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one background run owns
struct Run {
    shared: Arc<RwLock<Shared>>,
    extractor: Arc<dyn EntityExtractor>,
    categories: Vec<String>,
    cancel: CancellationToken,
    generation: u64,
    tx: mpsc::Sender<AnalysisUpdate>,
}

impl Run {
    /// Run every stage; `true` when the completion update was reached
    async fn execute(&self, content: &str) -> bool {
        // Tokenize
        if self.cancel.is_cancelled() {
            return false;
        }
        let tokens = scan(content);
        if !self.commit(|a| a.token_count = tokens.len()).await {
            return false;
        }
        self.publish(AnalysisUpdate::progress(TOKENIZE_PROGRESS));
        debug!("Run {}: {} tokens", self.generation, tokens.len());

        // Entities
        if self.cancel.is_cancelled() {
            return false;
        }
        let entities = match self
            .extractor
            .extract(&self.cancel, content, &self.categories)
            .await
        {
            Ok(entities) => entities,
            Err(ExtractorError::Cancelled) => return false,
            Err(e) => {
                warn!("Entity extraction failed, continuing without entities: {}", e);
                self.publish(AnalysisUpdate::error(ENTITY_PROGRESS, e.to_string()));
                Vec::new()
            }
        };
        let published = entities.clone();
        if !self.commit(|a| a.entities = entities).await {
            return false;
        }
        self.publish(AnalysisUpdate::progress(ENTITY_PROGRESS));
        for entity in published {
            self.publish(AnalysisUpdate::item(ENTITY_PROGRESS, UpdatePayload::Entity(entity)));
        }

        // Relationships
        if self.cancel.is_cancelled() {
            return false;
        }
        let relationships = extract_relationships(&tokens);
        let published = relationships.clone();
        if !self.commit(|a| a.relationships = relationships).await {
            return false;
        }
        self.publish(AnalysisUpdate::progress(RELATIONSHIP_PROGRESS));
        for rel in published {
            self.publish(AnalysisUpdate::item(
                RELATIONSHIP_PROGRESS,
                UpdatePayload::Relationship(rel),
            ));
        }

        // Typed holes
        if self.cancel.is_cancelled() {
            return false;
        }
        let holes = extract_typed_holes(&tokens);
        let published = holes.clone();
        if !self.commit(|a| a.typed_holes = holes).await {
            return false;
        }
        self.publish(AnalysisUpdate::progress(HOLE_PROGRESS));
        for hole in published {
            self.publish(AnalysisUpdate::item(HOLE_PROGRESS, UpdatePayload::TypedHole(hole)));
        }

        // Dependencies
        if self.cancel.is_cancelled() {
            return false;
        }
        let dependencies = extract_dependencies(content);
        let published = dependencies.clone();
        if !self.commit(|a| a.dependencies = dependencies).await {
            return false;
        }
        self.publish(AnalysisUpdate::progress(DEPENDENCY_PROGRESS));
        for dep in published {
            self.publish(AnalysisUpdate::item(
                DEPENDENCY_PROGRESS,
                UpdatePayload::Dependency(dep),
            ));
        }

        // Triples
        if self.cancel.is_cancelled() {
            return false;
        }
        if !self
            .commit(|a| a.triples = generate_triples(&a.relationships))
            .await
        {
            return false;
        }
        self.publish(AnalysisUpdate::progress(TRIPLE_PROGRESS));

        // Complete
        let completed = self
            .commit_state(|shared| {
                shared.analysis.duration = SystemTime::now()
                    .duration_since(shared.analysis.started_at)
                    .unwrap_or_default();
                shared.state = RunState::Completed;
            })
            .await;
        if !completed {
            return false;
        }

        if self.tx.send(AnalysisUpdate::complete()).await.is_err() {
            debug!("Run {}: consumer gone before completion", self.generation);
        }
        info!("Analysis run {} complete", self.generation);

        true
    }

    /// Mark a run that stopped early as cancelled, if it is still current
    async fn finish(&self, completed: bool) {
        if completed {
            return;
        }

        let mut shared = self.shared.write().await;
        if shared.generation == self.generation && shared.state == RunState::Running {
            shared.state = RunState::Cancelled;
        }
        debug!("Analysis run {} cancelled", self.generation);
    }

    /// Apply `write` to the analysis unless this run has been cancelled
    async fn commit(&self, write: impl FnOnce(&mut Analysis)) -> bool {
        self.commit_state(|shared| write(&mut shared.analysis)).await
    }

    async fn commit_state(&self, write: impl FnOnce(&mut Shared)) -> bool {
        let mut shared = self.shared.write().await;
        // checked under the lock so a superseded run never touches the new record
        if self.cancel.is_cancelled() {
            return false;
        }
        write(&mut shared);
        true
    }

    /// Best-effort send
    fn publish(&self, update: AnalysisUpdate) {
        match self.tx.try_send(update) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                debug!(
                    "Run {}: update stream full, dropped update at {:.2}",
                    self.generation, dropped.progress
                );
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}
