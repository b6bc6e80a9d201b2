//! Properties of the bulk import wizard.

use common::config::ClientConfig;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct BulkProps {
    /// Polling budget, page sizes and upload limit.
    pub config: Rc<ClientConfig>,
}
