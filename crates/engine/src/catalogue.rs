//! One-shot catalogue discovery.

use std::sync::Arc;
use std::time::Instant;

use fakernet_api::{ApiResult, ConsoleApi};
use fakernet_types::Catalogue;
use tracing::info;

use crate::view::{ElementId, RenderOp};

/// Placeholder option shown before a module is chosen.
pub const MODULE_PLACEHOLDER: &str = "Select Module";

/// Session-scoped, immutable catalogue loaded once at startup.
#[derive(Debug, Clone)]
pub struct CatalogueStore {
    catalogue: Arc<Catalogue>,
}

impl CatalogueStore {
    /// Fetch the catalogue from the discovery endpoint. No retry.
    pub async fn load(api: &dyn ConsoleApi) -> ApiResult<Self> {
        let start = Instant::now();
        let catalogue = api.fetch_catalogue().await?;
        info!(
            modules = catalogue.len(),
            duration_ms = start.elapsed().as_millis(),
            "loaded module catalogue"
        );
        Ok(Self::new(catalogue))
    }

    pub fn new(catalogue: Catalogue) -> Self {
        Self {
            catalogue: Arc::new(catalogue),
        }
    }

    pub fn catalogue(&self) -> &Arc<Catalogue> {
        &self.catalogue
    }

    /// Populate the module select with one option per module, server order.
    pub fn module_options(&self) -> RenderOp {
        RenderOp::ReplaceOptions {
            target: ElementId::ModuleSelect,
            placeholder: Some(MODULE_PLACEHOLDER.to_string()),
            options: self.catalogue.module_names().map(str::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_options_keep_catalogue_order() {
        let catalogue = Catalogue::from_json_str(r#"{"zeta":{},"alpha":{},"mid":{}}"#).expect("catalogue");
        let store = CatalogueStore::new(catalogue);
        assert_eq!(
            store.module_options(),
            RenderOp::ReplaceOptions {
                target: ElementId::ModuleSelect,
                placeholder: Some(MODULE_PLACEHOLDER.into()),
                options: vec!["zeta".into(), "alpha".into(), "mid".into()],
            }
        );
    }
}
