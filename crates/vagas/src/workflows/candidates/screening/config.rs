use serde::{Deserialize, Serialize};

/// Points awarded per satisfied requirement. Unmet requirements that are not
/// knock-outs score zero and are listed as gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningWeights {
    pub age: i16,
    pub licence: i16,
    pub location: i16,
    pub distance: i16,
    pub schooling: i16,
    pub field_of_study: i16,
    pub course: i16,
    pub experience_years: i16,
    pub experience_area: i16,
    pub leadership: i16,
    pub technology: i16,
    pub language: i16,
    pub certification: i16,
    pub soft_skill: i16,
    /// Extra points when a candidate exceeds a required proficiency level.
    pub level_bonus: i16,
}

impl Default for ScreeningWeights {
    fn default() -> Self {
        Self {
            age: 5,
            licence: 10,
            location: 10,
            distance: 5,
            schooling: 15,
            field_of_study: 10,
            course: 3,
            experience_years: 15,
            experience_area: 10,
            leadership: 10,
            technology: 8,
            language: 8,
            certification: 6,
            soft_skill: 2,
            level_bonus: 2,
        }
    }
}
