//! Sequence verification for cloned constructs: locate an expected ORF on a
//! circular plasmid and check sequencing reads against the expected plasmid.

#[macro_use]
mod par;

pub mod align;
pub mod alphabets;
pub mod error;
pub mod io;
pub mod orf;
pub mod seq;
pub mod verify;

pub use error::{CheckError, CheckResult};
pub use orf::{verify_orf, OrfReport, OrfSearchParams, OrfStatus};
pub use verify::{
    verify_annotation, verify_clone, AnnotationResult, CloneReport, CloneStatus, CloneVerifyParams,
    ReferenceProtein, ReferenceSequence, SequencingRead,
};
