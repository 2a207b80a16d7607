//! # Stage Records
//!
//! The static guidance table: one record per CKD stage with a display name,
//! the eGFR band label, a description and three ordered recommendation lists.
//!
//! List order is display order and is part of the table's contract.

use serde::Serialize;

/// Diet, lifestyle and monitoring guidance for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub diet: &'static [&'static str],
    pub lifestyle: &'static [&'static str],
    pub monitoring: &'static [&'static str],
}

/// Descriptive bundle attached to a CKD stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    pub stage: u8,
    pub name: &'static str,
    pub egfr_range_label: &'static str,
    pub description: &'static str,
    pub recommendations: Recommendations,
}

/// All five stage records, ordered by stage number.
pub static STAGE_RECORDS: [StageRecord; 5] = [
    StageRecord {
        stage: 1,
        name: "Normal or High Kidney Function",
        egfr_range_label: "90+",
        description: "Kidney function is normal or high, but there are other signs of \
                      kidney damage such as protein in the urine or structural findings. \
                      The goal is to slow progression and protect remaining function.",
        recommendations: Recommendations {
            diet: &[
                "Follow a balanced, low-sodium diet (under 2,300 mg per day)",
                "Eat plenty of fresh fruits and vegetables",
                "Limit processed foods and added sugars",
                "Stay well hydrated unless advised otherwise",
            ],
            lifestyle: &[
                "Exercise for at least 30 minutes on most days",
                "Maintain a healthy body weight",
                "Stop smoking and limit alcohol",
                "Avoid regular use of NSAID pain relievers",
            ],
            monitoring: &[
                "Check blood pressure regularly and keep it below 130/80",
                "Test kidney function (eGFR and urine albumin) once a year",
                "Control blood sugar if diabetic",
            ],
        },
    },
    StageRecord {
        stage: 2,
        name: "Mild Reduction in Kidney Function",
        egfr_range_label: "60-89",
        description: "Kidney function is mildly reduced with signs of kidney damage. \
                      Most people have no symptoms at this stage; managing risk factors \
                      can keep the disease from progressing.",
        recommendations: Recommendations {
            diet: &[
                "Keep sodium intake under 2,300 mg per day",
                "Choose heart-healthy fats and lean proteins",
                "Limit processed and fast foods",
                "Moderate protein intake; avoid high-protein supplements",
            ],
            lifestyle: &[
                "Stay physically active with regular moderate exercise",
                "Stop smoking",
                "Manage stress and keep a regular sleep schedule",
                "Review all medications and supplements with your doctor",
            ],
            monitoring: &[
                "Monitor blood pressure at home",
                "Test eGFR and urine albumin every 6 to 12 months",
                "Check HbA1c regularly if diabetic",
                "Check cholesterol levels yearly",
            ],
        },
    },
    StageRecord {
        stage: 3,
        name: "Moderate Reduction in Kidney Function",
        egfr_range_label: "30-59",
        description: "Kidney function is moderately reduced. Waste can begin to build up \
                      in the blood and complications such as anemia, high blood pressure \
                      and bone disease become more likely.",
        recommendations: Recommendations {
            diet: &[
                "Work with a renal dietitian on a kidney-friendly meal plan",
                "Limit sodium to under 2,000 mg per day",
                "Moderate protein intake as advised by your care team",
                "Limit foods high in phosphorus such as dairy, nuts and colas",
                "Watch potassium intake if blood levels are high",
            ],
            lifestyle: &[
                "Stay active within your energy limits",
                "Avoid NSAIDs and other kidney-toxic medications",
                "Keep all nephrology appointments",
                "Stay up to date with vaccinations",
            ],
            monitoring: &[
                "Test eGFR and electrolytes every 3 to 6 months",
                "Check hemoglobin for anemia",
                "Monitor calcium, phosphorus and PTH levels",
                "Keep blood pressure below target at every visit",
            ],
        },
    },
    StageRecord {
        stage: 4,
        name: "Severe Reduction in Kidney Function",
        egfr_range_label: "15-29",
        description: "Kidney function is severely reduced. This is the last stage before \
                      kidney failure, and it is the time to prepare for dialysis or a \
                      kidney transplant.",
        recommendations: Recommendations {
            diet: &[
                "Follow a renal diet prescribed by your dietitian",
                "Restrict potassium and phosphorus",
                "Limit protein to the amount advised by your care team",
                "Monitor fluid intake if you have swelling",
                "Avoid salt substitutes that contain potassium",
            ],
            lifestyle: &[
                "Discuss dialysis and transplant options with your nephrologist",
                "Protect the veins in your non-dominant arm for future access",
                "Continue gentle daily physical activity",
                "Seek support from family, counselors or support groups",
            ],
            monitoring: &[
                "See your nephrologist every 3 months or more often",
                "Test eGFR, electrolytes and hemoglobin regularly",
                "Watch for swelling, fatigue, nausea and shortness of breath",
                "Track daily weight and blood pressure",
            ],
        },
    },
    StageRecord {
        stage: 5,
        name: "Kidney Failure",
        egfr_range_label: "<15",
        description: "The kidneys have lost nearly all of their ability to function. \
                      Dialysis or a kidney transplant is needed to sustain life.",
        recommendations: Recommendations {
            diet: &[
                "Follow the dialysis diet prescribed by your renal dietitian",
                "Strictly limit fluid, sodium, potassium and phosphorus",
                "Take phosphate binders with meals as prescribed",
                "Eat adequate high-quality protein if on dialysis",
            ],
            lifestyle: &[
                "Attend every scheduled dialysis session",
                "Care for your dialysis access site daily",
                "Stay as active as your condition allows",
                "Keep your transplant evaluation up to date if eligible",
            ],
            monitoring: &[
                "Have monthly lab work (electrolytes, hemoglobin, adequacy)",
                "Weigh yourself daily to track fluid gain between sessions",
                "Report access-site redness, swelling or loss of thrill immediately",
                "Monitor blood pressure before and after dialysis",
            ],
        },
    },
];

/// Look up the record for a stage number.
///
/// Returns `None` when the number has no record; the caller decides how to
/// report it.
#[must_use]
pub fn stage_record(stage: u8) -> Option<&'static StageRecord> {
    STAGE_RECORDS.iter().find(|r| r.stage == stage)
}

/// All stage records, ordered by stage number.
#[must_use]
pub fn stage_records() -> &'static [StageRecord] {
    &STAGE_RECORDS
}

// =============================================================================
// TESTS
// =============================================================================
