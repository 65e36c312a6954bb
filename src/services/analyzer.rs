use crate::services::extraction::{AnalysisReport, Language, canned_report};
use anyhow::{Result, anyhow};
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};

/// What the analyzer is asked to work on. The staged bytes are deliberately
/// absent: the simulated backend produces language-keyed output only.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub document_id: String,
    pub language: Language,
}

/// Trait for document analysis (OCR + entity recognition) backends
#[async_trait::async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Run analysis, reporting coarse progress (0..=100) on `progress`.
    /// Receiver lag must not stall the analysis, so sends are best-effort.
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        progress: mpsc::Sender<u8>,
    ) -> Result<AnalysisReport>;

    fn name(&self) -> &'static str;
}

/// Simulated analyzer: walks progress from 0 to 100 on a fixed cadence and
/// returns the canned per-language payload. No uploaded byte is ever read.
pub struct SimulatedAnalyzer {
    tick: Duration,
    step: u8,
}

impl SimulatedAnalyzer {
    pub fn new(tick_ms: u64, step: u8) -> Self {
        Self {
            tick: Duration::from_millis(tick_ms),
            step: step.clamp(1, 100),
        }
    }
}

#[async_trait::async_trait]
impl DocumentAnalyzer for SimulatedAnalyzer {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        progress: mpsc::Sender<u8>,
    ) -> Result<AnalysisReport> {
        let mut current: u16 = 0;
        loop {
            sleep(self.tick).await;
            let _ = progress.try_send(current.min(100) as u8);
            if current >= 100 {
                break;
            }
            current += self.step as u16;
        }

        tracing::debug!(
            "Simulated analysis finished for document {} ({})",
            request.document_id,
            request.language.as_code()
        );

        Ok(canned_report(request.language))
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

/// Analyzer that always fails; exercises the error transition.
pub struct FailingAnalyzer;

#[async_trait::async_trait]
impl DocumentAnalyzer for FailingAnalyzer {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        _progress: mpsc::Sender<u8>,
    ) -> Result<AnalysisReport> {
        Err(anyhow!(
            "analysis backend unavailable for document {}",
            request.document_id
        ))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Factory function to create the analyzer configured for this process
pub fn create_analyzer(analyzer_type: &str, tick_ms: u64, step: u8) -> Box<dyn DocumentAnalyzer> {
    match analyzer_type.to_lowercase().as_str() {
        "simulated" => Box::new(SimulatedAnalyzer::new(tick_ms, step)),
        _ => {
            tracing::warn!(
                "Unknown analyzer type '{}', using SimulatedAnalyzer",
                analyzer_type
            );
            Box::new(SimulatedAnalyzer::new(tick_ms, step))
        }
    }
}
