pub mod condition;
pub mod dossier;
pub mod interaction;
pub mod lint;
pub mod response;
pub mod tag;

pub use condition::{ConditionType, ResponseCondition};
pub use dossier::{DossierError, GenericQuestion, SuspectDossier};
pub use interaction::{ResponseVariantGroup, TagInteraction, DEFAULT_TAG_QUESTION};
pub use lint::{lint_dossier, LintFinding, LintReport, Severity};
pub use response::{ClickableClueSegment, HighlightColor, ResponseType, TagResponse};
pub use tag::TagId;
