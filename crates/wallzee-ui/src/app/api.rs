//! Shared API client context.
//!
//! # Design
//! - Exactly one client per app boot, handed down through a context.

use std::rc::Rc;

use wallzee_config::WallzeeConfig;
use yew::prelude::*;

use crate::services::api::ApiClient;

/// Shared API client context for components.
#[derive(Clone)]
pub(crate) struct ApiCtx {
    /// Singleton client.
    pub client: Rc<ApiClient>,
}

impl ApiCtx {
    pub(crate) fn new(config: &WallzeeConfig) -> Self {
        Self {
            client: Rc::new(ApiClient::new(config)),
        }
    }
}

impl PartialEq for ApiCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}

/// Client from the nearest context, or one built from defaults.
#[hook]
pub(crate) fn use_api() -> Rc<ApiClient> {
    use_context::<ApiCtx>().map_or_else(
        || Rc::new(ApiClient::new(&WallzeeConfig::default())),
        |ctx| ctx.client,
    )
}
