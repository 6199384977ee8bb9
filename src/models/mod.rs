pub mod form;
pub mod grades;
pub mod option;
pub mod proforma;
pub mod rating;

pub use form::FormData;
pub use grades::{
    AmbiguousMatch, CapturedGrades, CourseCorrelation, RatingAssignment, SecondaryRatingMap,
};
pub use option::OptionEntity;
pub use proforma::{LoginLayout, Proforma, ProformaKind, RatingSource, LOGIN};
pub use rating::Rating;
