pub mod consequence;
pub mod record;
pub mod xref;

// re-export for cleaner imports
pub use self::consequence::{ConsequenceType, Score};
pub use self::record::AnnotationRecord;
pub use self::xref::Xref;
