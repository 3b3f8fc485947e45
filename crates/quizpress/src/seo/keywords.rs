//! Curated keyword lists, per exam and sub-exam.

/// Keywords curated for one exam. Some exams are broad enough to warrant a list per sub-exam.
#[derive(Debug)]
pub enum ExamKeywords {
    Flat(&'static [&'static str]),
    BySubExam {
        by_sub_exam: &'static [(&'static str, &'static [&'static str])],
        default: &'static [&'static str],
    },
}

impl ExamKeywords {
    /// Keywords to use for a question of this exam, given its sub-exam (if any).
    pub fn for_sub_exam(&self, sub_exam: Option<&str>) -> &'static [&'static str] {
        match *self {
            ExamKeywords::Flat(keywords) => keywords,
            ExamKeywords::BySubExam {
                by_sub_exam,
                default,
            } => sub_exam
                .and_then(|sub_exam| {
                    by_sub_exam
                        .iter()
                        .find(|(name, _)| name.eq_ignore_ascii_case(sub_exam.trim()))
                })
                .map_or(default, |(_, keywords)| *keywords),
        }
    }
}

static EXAM_KEYWORDS: &[(&str, ExamKeywords)] = &[
    (
        "SSC",
        ExamKeywords::BySubExam {
            by_sub_exam: &[
                (
                    "CGL",
                    &[
                        "ssc cgl",
                        "ssc cgl previous year questions",
                        "ssc cgl tier 1",
                        "ssc cgl quantitative aptitude",
                    ],
                ),
                (
                    "CHSL",
                    &[
                        "ssc chsl",
                        "ssc chsl previous year questions",
                        "ssc chsl practice set",
                    ],
                ),
                ("MTS", &["ssc mts", "ssc mts practice questions"]),
                ("GD", &["ssc gd", "ssc gd constable questions"]),
            ],
            default: &["ssc exam", "ssc previous year questions", "ssc practice set"],
        },
    ),
    (
        "CAT",
        ExamKeywords::Flat(&[
            "cat exam",
            "cat quant",
            "cat previous year questions",
            "mba entrance exam",
            "iim admission",
        ]),
    ),
    (
        "GATE",
        ExamKeywords::BySubExam {
            by_sub_exam: &[
                (
                    "CSE",
                    &[
                        "gate cse",
                        "gate computer science",
                        "gate cse previous year questions",
                    ],
                ),
                ("ECE", &["gate ece", "gate electronics"]),
                ("ME", &["gate me", "gate mechanical engineering"]),
            ],
            default: &["gate exam", "gate previous year questions", "gate preparation"],
        },
    ),
    (
        "JEE",
        ExamKeywords::BySubExam {
            by_sub_exam: &[
                ("Main", &["jee main", "jee main previous year questions", "nta jee main"]),
                ("Advanced", &["jee advanced", "iit jee advanced questions"]),
            ],
            default: &["jee", "iit jee", "jee preparation"],
        },
    ),
    (
        "NEET",
        ExamKeywords::Flat(&[
            "neet",
            "neet ug",
            "neet previous year questions",
            "medical entrance exam",
        ]),
    ),
    (
        "UPSC",
        ExamKeywords::Flat(&[
            "upsc",
            "upsc prelims",
            "civil services exam",
            "ias preparation",
        ]),
    ),
    (
        "IBPS",
        ExamKeywords::BySubExam {
            by_sub_exam: &[
                ("PO", &["ibps po", "ibps po prelims"]),
                ("Clerk", &["ibps clerk", "ibps clerk prelims"]),
            ],
            default: &["ibps", "bank exam", "banking aptitude"],
        },
    ),
];

/// Generic keywords appended to every question, after everything specific.
pub const UNIVERSAL_KEYWORDS: &[&str] = &[
    "practice questions",
    "solved questions",
    "previous year questions",
    "mock test",
    "online quiz",
    "exam preparation",
];

/// Looks up the curated keywords of an exam. The exam name is matched case-insensitively.
pub fn exam_keywords(exam: &str) -> Option<&'static ExamKeywords> {
    let exam = exam.trim();
    EXAM_KEYWORDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(exam))
        .map(|(_, keywords)| keywords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_exam_ignores_sub_exam() {
        let cat = exam_keywords("cat").unwrap();
        assert_eq!(cat.for_sub_exam(Some("Anything")), cat.for_sub_exam(None));
        assert!(cat.for_sub_exam(None).contains(&"cat quant"));
    }

    #[test]
    fn test_sub_exam_lookup_with_default() {
        let ssc = exam_keywords("SSC").unwrap();
        assert_eq!(ssc.for_sub_exam(Some("cgl"))[0], "ssc cgl");
        assert_eq!(ssc.for_sub_exam(Some("Selection Post"))[0], "ssc exam");
        assert_eq!(ssc.for_sub_exam(None)[0], "ssc exam");
    }

    #[test]
    fn test_unknown_exam() {
        assert!(exam_keywords("Olympiad").is_none());
    }
}
