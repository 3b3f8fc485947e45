//! HTML pages, written with [Maud](https://maud.lambda.xyz).
pub mod layout;
pub mod pages;

pub use layout::{PageHead, generator, layout};
pub use pages::{Site, course_page, exam_page, exam_topic_page, question_page, topic_page};
