//! Model inference for forecast runs.

use std::sync::Arc;

use tracing::debug;

use super::{ModelError, ModelLoader};

/// Loads the model and predicts, once per call.
///
/// Loading and prediction run on the blocking pool: artifact reads are file IO
/// and a long recursion should not stall the runtime. A panic inside the model
/// comes back as [`ModelError::Inference`].
#[derive(Clone)]
pub struct ModelAdapter {
    loader: Arc<dyn ModelLoader>,
}

impl ModelAdapter {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self { loader }
    }

    pub async fn predict(&self, horizon_steps: usize) -> Result<Vec<f64>, ModelError> {
        if horizon_steps == 0 {
            return Err(ModelError::Invalid("horizon must be positive".to_string()));
        }

        let loader = Arc::clone(&self.loader);
        let increments = tokio::task::spawn_blocking(move || {
            let model = loader.load()?;
            debug!(
                model_id = %model.metadata().model_id,
                horizon_steps,
                "running model inference"
            );
            model.predict(horizon_steps)
        })
        .await
        .map_err(|e| ModelError::Inference(format!("model task aborted: {e}")))??;

        if increments.len() != horizon_steps {
            return Err(ModelError::Inference(format!(
                "model returned {} values for a horizon of {}",
                increments.len(),
                horizon_steps
            )));
        }
        Ok(increments)
    }
}
