pub mod circular;
pub mod feature;
pub mod translate;

pub use circular::{extract_circular, rotate};
pub use feature::{
    cds_at, extract_feature_sequence, extract_observed_feature, feature_at, shift_features,
    Feature, FeatureLocation, Strand,
};
pub use translate::{translate, translate_codon, translate_strict};
