//! The bulk user-import workflow: upload checks, missing-user selection and
//! the step guards of the import wizard.

pub mod selection;
pub mod upload;
pub mod workflow;
