//! The process-wide set of classifiers, one per disease.
//!
//! The registry is built once at startup and never mutated afterwards. It holds
//! exactly one classifier per disease, so lookups cannot fail.

use crate::model::{Classifier, ModelArtifact, ModelError};
use crate::schema::Disease;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to load the {disease} model from '{}': {source}", .path.display())]
    Load {
        disease: Disease,
        path: PathBuf,
        #[source]
        source: ModelError,
    },
    #[error(
        "The {disease} model expects {found} features, but the form provides {expected}."
    )]
    SchemaMismatch {
        disease: Disease,
        expected: usize,
        found: usize,
    },
}

#[derive(Clone)]
pub struct ModelRegistry {
    parkinsons: Arc<dyn Classifier>,
    kidney: Arc<dyn Classifier>,
    liver: Arc<dyn Classifier>,
}

/// Location of a disease's artifact inside a model directory.
pub fn model_path(dir: &Path, disease: Disease) -> PathBuf {
    dir.join(format!("{}.toml", disease.model_stem()))
}

impl ModelRegistry {
    pub fn new(
        parkinsons: Arc<dyn Classifier>,
        kidney: Arc<dyn Classifier>,
        liver: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            parkinsons,
            kidney,
            liver,
        }
    }

    /// Loads `parkinsons_model.toml`, `kidney_model.toml` and `liver_model.toml`.
    ///
    /// A model whose arity disagrees with its form is only logged: the flows
    /// decide per disease whether that mismatch is caught before dispatch.
    pub fn load_dir(dir: &Path) -> Result<Self, RegistryError> {
        let load = |disease: Disease| -> Result<Arc<dyn Classifier>, RegistryError> {
            let path = model_path(dir, disease);
            let artifact = ModelArtifact::load(&path).map_err(|source| RegistryError::Load {
                disease,
                path: path.clone(),
                source,
            })?;
            log::info!(
                "Loaded {} model from {} ({} features)",
                disease,
                path.display(),
                artifact.n_features_in
            );
            if let Err(mismatch) = check_schema(disease, &artifact) {
                log::warn!("{mismatch}");
            }
            Ok(Arc::new(artifact))
        };

        Ok(Self::new(
            load(Disease::Parkinsons)?,
            load(Disease::Kidney)?,
            load(Disease::Liver)?,
        ))
    }

    pub fn model(&self, disease: Disease) -> &dyn Classifier {
        match disease {
            Disease::Parkinsons => self.parkinsons.as_ref(),
            Disease::Kidney => self.kidney.as_ref(),
            Disease::Liver => self.liver.as_ref(),
        }
    }
}

/// Compares a classifier's arity with the number of model inputs on its form.
pub fn check_schema(disease: Disease, model: &dyn Classifier) -> Result<(), RegistryError> {
    let expected = disease.model_input_count();
    let found = model.n_features_in();
    if expected != found {
        return Err(RegistryError::SchemaMismatch {
            disease,
            expected,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassifierSpec, LogisticModel};
    use tempfile::tempdir;

    fn write_logistic(dir: &Path, disease: Disease, n: usize) {
        let artifact = ModelArtifact {
            n_features_in: n,
            feature_names: None,
            classifier: ClassifierSpec::Logistic(LogisticModel {
                intercept: 0.0,
                coefficients: vec![0.1; n],
                threshold: 0.5,
            }),
        };
        artifact
            .save(model_path(dir, disease))
            .expect("write model artifact");
    }

    #[test]
    fn loads_one_model_per_disease() {
        let dir = tempdir().expect("temporary directory");
        for disease in Disease::ALL {
            write_logistic(dir.path(), disease, disease.model_input_count());
        }

        let registry = ModelRegistry::load_dir(dir.path()).expect("load registry");
        for disease in Disease::ALL {
            assert_eq!(
                registry.model(disease).n_features_in(),
                disease.model_input_count()
            );
        }
    }

    #[test]
    fn missing_model_names_disease_and_path() {
        let dir = tempdir().expect("temporary directory");
        write_logistic(dir.path(), Disease::Parkinsons, 22);
        write_logistic(dir.path(), Disease::Kidney, 24);

        let err = match ModelRegistry::load_dir(dir.path()) {
            Ok(_) => panic!("liver model is missing"),
            Err(err) => err,
        };
        let message = err.to_string();
        assert!(message.contains("Liver"), "{message}");
        assert!(message.contains("liver_model.toml"), "{message}");
    }

    #[test]
    fn schema_mismatch_is_reported_but_not_fatal() {
        let dir = tempdir().expect("temporary directory");
        write_logistic(dir.path(), Disease::Parkinsons, 22);
        write_logistic(dir.path(), Disease::Kidney, 23);
        write_logistic(dir.path(), Disease::Liver, 10);

        let registry = ModelRegistry::load_dir(dir.path()).expect("load registry");
        let mismatch = check_schema(Disease::Kidney, registry.model(Disease::Kidney));
        assert!(matches!(
            mismatch,
            Err(RegistryError::SchemaMismatch {
                expected: 24,
                found: 23,
                ..
            })
        ));
    }
}
