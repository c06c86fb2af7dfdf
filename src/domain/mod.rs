mod artifacts;
mod business_profile;
mod comparison;
mod images;
mod job;
mod job_id;
mod job_status;
mod merchant;
mod narrative;
mod statement;
mod step;
mod step_event;
mod storage_path;

pub use artifacts::{ArtifactName, ArtifactValue, ArtifactWrite, Artifacts, RenderedDocument};
pub use business_profile::{BusinessProfile, ProfileSource};
pub use comparison::{ComparisonData, ComparisonError, PricingTerms};
pub use images::{GeneratedImage, ImageGenerationStatus, ImageOutcome, ImageSet};
pub use job::Job;
pub use job_id::{JobId, OrganizationId, OwnerId};
pub use job_status::JobStatus;
pub use merchant::{ContentType, InputSnapshot, MerchantProfile, ProposalOptions, SourceDocument};
pub use narrative::{Narrative, NarrativeSource};
pub use statement::{CardBrandVolume, ParsedStatement};
pub use step::{FailureClass, STEP_TABLE, StepDescriptor, StepName, StepState, StepStatus};
pub use step_event::{StepEvent, TransitionError};
pub use storage_path::StoragePath;
