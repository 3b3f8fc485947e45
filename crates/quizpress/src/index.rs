//! Lookup tables over a batch of questions.
use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use slug::slugify;

use crate::question::Question;

/// Separator between exam and topic in [`QuestionIndexes::by_exam_and_topic`] keys. Exam and topic names are not
/// expected to contain it.
pub const EXAM_TOPIC_SEPARATOR: &str = "::";

/// Questions grouped by their classification fields.
///
/// Grouped tables are ordered by key, so iterating them is deterministic. Within a bucket, questions keep their
/// input order.
#[derive(Debug, Default)]
pub struct QuestionIndexes<'a> {
    pub by_topic: BTreeMap<String, Vec<&'a Question>>,
    pub by_category: BTreeMap<String, Vec<&'a Question>>,
    pub by_exam: BTreeMap<String, Vec<&'a Question>>,
    pub by_exam_and_topic: BTreeMap<String, Vec<&'a Question>>,
    pub by_question_number: FxHashMap<u64, &'a Question>,
}

impl<'a> QuestionIndexes<'a> {
    /// Questions of one exam and topic.
    pub fn exam_topic(&self, exam: &str, topic: &str) -> &[&'a Question] {
        self.by_exam_and_topic
            .get(&exam_topic_key(exam, topic))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Exam questions grouped by page route.
    ///
    /// Exam and topic names that slugify to the same route segment (`SSC` and `ssc`) share one group, with their
    /// questions merged in key order. Groups and their topics are keyed by that segment.
    pub fn exam_groups(&self) -> BTreeMap<String, ExamGroup<'a>> {
        let mut groups: BTreeMap<String, ExamGroup<'a>> = BTreeMap::new();

        for (exam, questions) in &self.by_exam {
            groups
                .entry(slugify(exam))
                .or_insert_with(|| ExamGroup::new(exam))
                .questions
                .extend(questions.iter().copied());
        }

        for (key, questions) in &self.by_exam_and_topic {
            let Some((exam, topic)) = split_exam_topic_key(key) else {
                continue;
            };

            groups
                .entry(slugify(exam))
                .or_insert_with(|| ExamGroup::new(exam))
                .topics
                .entry(slugify(topic))
                .or_insert_with(|| TopicGroup {
                    name: topic.to_string(),
                    questions: Vec::new(),
                })
                .questions
                .extend(questions.iter().copied());
        }

        groups
    }
}

/// Questions behind one exam page. `name` is the first spelling of the exam in key order.
#[derive(Debug)]
pub struct ExamGroup<'a> {
    pub name: String,
    pub questions: Vec<&'a Question>,
    pub topics: BTreeMap<String, TopicGroup<'a>>,
}

impl ExamGroup<'_> {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            questions: Vec::new(),
            topics: BTreeMap::new(),
        }
    }

    /// Topic names with their question count, in route order.
    pub fn topic_counts(&self) -> Vec<(&str, usize)> {
        self.topics
            .values()
            .map(|topic| (topic.name.as_str(), topic.questions.len()))
            .collect()
    }
}

/// Questions behind one exam topic page.
#[derive(Debug)]
pub struct TopicGroup<'a> {
    pub name: String,
    pub questions: Vec<&'a Question>,
}

pub fn exam_topic_key(exam: &str, topic: &str) -> String {
    format!("{exam}{EXAM_TOPIC_SEPARATOR}{topic}")
}

pub fn split_exam_topic_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(EXAM_TOPIC_SEPARATOR)
}

/// Builds every index in a single pass over `questions`.
///
/// A question only lands in the buckets whose key field it has: without a topic, it is in neither `by_topic` nor
/// `by_exam_and_topic`.
pub fn build_question_indexes(questions: &[Question]) -> QuestionIndexes<'_> {
    let mut indexes = QuestionIndexes::default();

    for question in questions {
        if let Some(topic) = &question.topic {
            indexes
                .by_topic
                .entry(topic.clone())
                .or_default()
                .push(question);
        }

        if let Some(category) = &question.category {
            indexes
                .by_category
                .entry(category.clone())
                .or_default()
                .push(question);
        }

        if let Some(exam) = &question.exam {
            indexes
                .by_exam
                .entry(exam.clone())
                .or_default()
                .push(question);

            if let Some(topic) = &question.topic {
                indexes
                    .by_exam_and_topic
                    .entry(exam_topic_key(exam, topic))
                    .or_default()
                    .push(question);
            }
        }

        indexes
            .by_question_number
            .insert(question.question_number, question);
    }

    indexes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(number: u64, exam: Option<&str>, topic: Option<&str>, category: Option<&str>) -> Question {
        Question {
            exam: exam.map(String::from),
            topic: topic.map(String::from),
            category: category.map(String::from),
            ..Question::new(number)
        }
    }

    fn sample() -> Vec<Question> {
        vec![
            question(1, Some("SSC"), Some("Algebra"), Some("Maths")),
            question(2, Some("SSC"), Some("Geometry"), Some("Maths")),
            question(3, Some("CAT"), Some("Algebra"), None),
            question(4, Some("SSC"), None, Some("Reasoning")),
            question(5, None, Some("Algebra"), None),
            question(6, Some("SSC"), Some("Algebra"), None),
        ]
    }

    fn numbers(questions: &[&Question]) -> Vec<u64> {
        questions.iter().map(|q| q.question_number).collect()
    }

    #[test]
    fn test_buckets() {
        let questions = sample();
        let indexes = build_question_indexes(&questions);

        assert_eq!(numbers(&indexes.by_topic["Algebra"]), vec![1, 3, 5, 6]);
        assert_eq!(numbers(&indexes.by_category["Maths"]), vec![1, 2]);
        assert_eq!(numbers(&indexes.by_exam["SSC"]), vec![1, 2, 4, 6]);
        assert_eq!(numbers(&indexes.by_exam_and_topic["SSC::Algebra"]), vec![1, 6]);
        assert_eq!(indexes.by_question_number.len(), 6);
        assert_eq!(indexes.by_question_number[&4].question_number, 4);
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let questions = sample();
        let indexes = build_question_indexes(&questions);

        // Question 4 has no topic, question 5 no exam
        assert!(indexes.by_topic.values().flatten().all(|q| q.question_number != 4));
        assert!(
            indexes
                .by_exam_and_topic
                .values()
                .flatten()
                .all(|q| q.question_number != 4 && q.question_number != 5)
        );
        assert_eq!(indexes.by_category.len(), 2);
    }

    #[test]
    fn test_exam_groups() {
        let questions = sample();
        let indexes = build_question_indexes(&questions);
        let groups = indexes.exam_groups();

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["cat", "ssc"]);

        let ssc = &groups["ssc"];
        assert_eq!(ssc.name, "SSC");
        assert_eq!(numbers(&ssc.questions), vec![1, 2, 4, 6]);
        assert_eq!(ssc.topic_counts(), vec![("Algebra", 2), ("Geometry", 1)]);
        assert_eq!(numbers(&ssc.topics["algebra"].questions), vec![1, 6]);

        assert_eq!(numbers(indexes.exam_topic("CAT", "Algebra")), vec![3]);
        assert!(indexes.exam_topic("CAT", "Geometry").is_empty());
    }

    #[test]
    fn test_exam_groups_merge_names_sharing_a_route() {
        let questions = vec![
            question(1, Some("SSC"), Some("Algebra"), None),
            question(2, Some("ssc"), Some("algebra"), None),
            question(3, Some("ssc"), Some("Number System"), None),
            question(4, Some("S.S.C"), None, None),
        ];
        let indexes = build_question_indexes(&questions);
        let groups = indexes.exam_groups();

        // "S.S.C" slugifies to "s-s-c", a route of its own
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["s-s-c", "ssc"]);

        let ssc = &groups["ssc"];
        assert_eq!(ssc.name, "SSC");
        assert_eq!(numbers(&ssc.questions), vec![1, 2, 3]);
        assert_eq!(
            ssc.topic_counts(),
            vec![("Algebra", 2), ("Number System", 1)]
        );
        assert_eq!(numbers(&ssc.topics["algebra"].questions), vec![1, 2]);

        // The raw tables keep both spellings apart
        assert_eq!(indexes.by_exam.len(), 3);
    }

    #[test]
    fn test_indexes_are_deterministic() {
        let questions = sample();
        let first = build_question_indexes(&questions);
        let second = build_question_indexes(&questions);

        let shape = |indexes: &QuestionIndexes| {
            [
                &indexes.by_topic,
                &indexes.by_category,
                &indexes.by_exam,
                &indexes.by_exam_and_topic,
            ]
            .map(|table| {
                table
                    .iter()
                    .map(|(key, questions)| (key.clone(), numbers(questions)))
                    .collect::<Vec<_>>()
            })
        };

        assert_eq!(shape(&first), shape(&second));

        let mut first_numbers: Vec<_> = first.by_question_number.keys().collect();
        let mut second_numbers: Vec<_> = second.by_question_number.keys().collect();
        first_numbers.sort();
        second_numbers.sort();
        assert_eq!(first_numbers, second_numbers);
    }
}
