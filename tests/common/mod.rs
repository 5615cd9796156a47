use multidx::model::{Classifier, ModelError};
use multidx::registry::ModelRegistry;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A classifier that answers with a fixed label and remembers every vector it saw.
pub struct Recording {
    arity: usize,
    label: i64,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<f64>>>,
}

impl Recording {
    pub fn new(arity: usize, label: i64) -> Arc<Self> {
        Arc::new(Self {
            arity,
            label,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_seen(&self) -> Option<Vec<f64>> {
        self.seen.lock().expect("seen lock").last().cloned()
    }
}

impl Classifier for Recording {
    fn n_features_in(&self) -> usize {
        self.arity
    }

    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if features.len() != self.arity {
            return Err(ModelError::MismatchedFeatureCount {
                found: features.len(),
                expected: self.arity,
            });
        }
        self.seen
            .lock()
            .expect("seen lock")
            .push(features.to_vec());
        Ok(self.label)
    }
}

pub struct Models {
    pub parkinsons: Arc<Recording>,
    pub kidney: Arc<Recording>,
    pub liver: Arc<Recording>,
}

impl Models {
    /// Correctly sized classifiers that all return `label`.
    pub fn answering(label: i64) -> Self {
        Self {
            parkinsons: Recording::new(22, label),
            kidney: Recording::new(24, label),
            liver: Recording::new(10, label),
        }
    }

    pub fn registry(&self) -> ModelRegistry {
        ModelRegistry::new(
            self.parkinsons.clone(),
            self.kidney.clone(),
            self.liver.clone(),
        )
    }
}

/// `count` distinct numeric strings: "1.5", "2.5", ...
pub fn numbers(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{i}.5")).collect()
}
