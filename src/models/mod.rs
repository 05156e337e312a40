pub mod exam;
pub mod grade;
pub mod identifier;
pub mod loaders;
pub mod record;
pub mod section;

pub use exam::{ExamCatalog, ExamEntry};
pub use grade::GradePoint;
pub use identifier::{Identifier, Intake, SequenceToken};
pub use loaders::{load_section_table, parse_section_table};
pub use record::{StudentRecord, SubjectEntry, Verdict};
pub use section::{IndexRange, SectionDescriptor, SectionTable};
