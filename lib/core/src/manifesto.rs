use serde::{Deserialize, Serialize};
use validator::Validate;

use analog_utils::checks::check_manifesto_content;
use analog_utils::errors::AppError;

use crate::backend::{retry_once, Backend, ManifestoBackend};

/// One anonymous contribution to the shared manifesto wall. Entries carry
/// no author column at all; anonymity is structural, not presentational.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ManifestoEntry {
    pub entry_id: i64,
    pub content: String,
    pub create_timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Validate, Serialize, Deserialize)]
pub struct ManifestoInputs {
    #[validate(custom(function = "check_manifesto_content"))]
    pub content: String,
}

impl ManifestoInputs {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    pub fn trimmed(&self) -> Self {
        Self {
            content: self.content.trim().to_string(),
        }
    }
}

pub async fn create_manifesto_entry<B: Backend>(
    inputs: ManifestoInputs,
    backend: &B,
) -> Result<ManifestoEntry, AppError> {
    let inputs = inputs.trimmed();
    inputs.validate()?;

    let entry = retry_once(|| backend.insert_manifesto_entry(&inputs.content)).await?;
    log::trace!("Created manifesto entry {}", entry.entry_id);
    Ok(entry)
}

/// All manifesto entries, most recent first.
pub async fn get_manifesto_entry_vec<B: Backend>(
    backend: &B,
) -> Result<Vec<ManifestoEntry>, AppError> {
    retry_once(|| backend.manifesto_entry_vec()).await
}

#[cfg(test)]
mod tests {
    use crate::manifesto::ManifestoInputs;

    #[test]
    fn test_manifesto_inputs_trimmed() {
        let inputs = ManifestoInputs::new("\n  less screen, more life  ");
        assert_eq!(inputs.trimmed().content, "less screen, more life");
    }
}
