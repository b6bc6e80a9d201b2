use common::config::ClientConfig;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct HistoryProps {
    pub config: Rc<ClientConfig>,
}
