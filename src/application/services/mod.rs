pub mod mutation_service;
pub mod projection;
pub mod reorder;
pub mod selection;

pub use mutation_service::MutationService;
pub use projection::{
    AccountQuery, Projection, StatusFilter, SubmissionQuery, accounts_projection,
    project_accounts, project_submissions, project_tag_groups, project_templates,
    submissions_projection, tag_groups_projection, templates_projection,
};
pub use reorder::{ReorderEngine, ReorderRequest, apply_move, position_for};
pub use selection::{ClickModifiers, SelectionMode, SelectionState};
