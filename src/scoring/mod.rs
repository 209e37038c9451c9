pub mod engine;
pub mod inputs;
pub mod validation;

pub use engine::{
    calculate_method_result, calculate_scores, score_category, CategoryScore, CategoryScores,
    FactorScore, MethodResult, ScoringResult,
};
pub use inputs::InputRecord;
pub use validation::{validate_inputs, FieldError, InputError, ValidationReport};
