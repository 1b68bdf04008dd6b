//! Small in-memory surveys shared by the unit tests.

use super::loader::{LoaderOptions, parse_str};
use super::model::Dataset;

/// Five responses covering missing industry, missing gender and an all-zero
/// hobby column (`hobby_sport`).
pub const SAMPLE: &str = "\
age;edu_level;gender;industry;sweet_or_salty;years_of_experience;fav_animals;fav_place;hobby_art;hobby_sport;hobby_reading;motivation_career;motivation_challenges;learning_pref_books;learning_pref_online_courses
18-24;Higher;0;IT;sweet;0-2;Dogs;By the sea;1;0;1;1;0;1;1
25-34;Secondary;1;;salty;3-5;Cats;In the mountains;0;0;1;1;1;0;1
25-34;Higher;1;Finance;sweet;3-5;Dogs;By the sea;1;0;0;0;1;0;1
35-44;Primary;;IT;salty;6-10;;By the lake;0;0;0;1;0;0;1
25-34;Higher;0; ;sweet;0-2;Cats;In the mountains;1;0;1;1;1;1;1
";

pub fn dataset_from_csv(text: &str) -> Dataset {
    parse_str(text, &LoaderOptions::default()).expect("fixture parses")
}
