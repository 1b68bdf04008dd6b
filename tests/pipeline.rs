use std::io::Write;

use survey_explorer::analysis::{RankOrder, aggregate, correlate, cross_tab, share_percentage, summarize};
use survey_explorer::dashboard::DashboardOptions;
use survey_explorer::data::export::export_file;
use survey_explorer::data::filter::{FilterCriteria, apply};
use survey_explorer::data::groups::{HOBBY, LEARNING_PREF, MOTIVATION};
use survey_explorer::data::loader::{LoaderOptions, parse_str};
use survey_explorer::data::model::FieldValue;
use survey_explorer::data::repository::DatasetRepository;
use survey_explorer::state::ExplorerState;

const SURVEY: &str = "\
age;edu_level;fav_animals;fav_place;gender;industry;sweet_or_salty;years_of_experience;hobby_art;hobby_books;hobby_sport;motivation_career;motivation_remote;learning_pref_books;learning_pref_chatgpt
25-34;Higher;Dogs;By the sea;1.0;IT;sweet;6-10;0;1;1;1;0;0;1
35-44;Higher;Cats;In the mountains;0.0;Finance;salty;11-15;1;1;0;1;1;1;0
18-24;Secondary;;By the sea;0.0;;sweet;0-2;1;0;0;0;0;0;1
25-34;Higher;Dogs;;1.0;IT;salty;3-5;0;0;1;1;0;0;1
45-54;Higher;Other;By the lake;;Education;;>=16;0;1;0;0;1;1;0
25-34;Secondary;Cats;In the mountains;1.0;IT;sweet;3-5;0;0;0;1;0;0;0
";

fn survey() -> survey_explorer::data::model::Dataset {
    parse_str(SURVEY, &LoaderOptions::default()).unwrap()
}

#[test]
fn load_filter_export_round_trip() {
    let mut input = tempfile::NamedTempFile::new().unwrap();
    input.write_all(SURVEY.as_bytes()).unwrap();
    input.flush().unwrap();

    let repo = DatasetRepository::load(input.path(), LoaderOptions::default()).unwrap();
    let mut state = ExplorerState::new(repo.dataset());
    state.set_filter("industry", "IT").unwrap();
    state.set_filter("gender", "man").unwrap();
    let filtered = state.filtered();
    assert_eq!(filtered.len(), 3);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("filtered.csv");
    export_file(&filtered, &out).unwrap();

    let reloaded = DatasetRepository::load(&out, LoaderOptions::default()).unwrap();
    assert_eq!(*reloaded.dataset(), filtered);
}

#[test]
fn no_match_flows_through_every_component() {
    let ds = survey();
    let none = apply(&ds, &FilterCriteria::new().with("industry", "Mining")).unwrap();
    assert!(none.is_empty());

    assert!(summarize(&none, "age").unwrap().is_empty());
    assert!(cross_tab(&none, "age", "years_of_experience").unwrap().is_empty());
    assert!(aggregate(&none, HOBBY, RankOrder::Ascending).unwrap().is_empty());
    assert_eq!(share_percentage(&none, "sweet_or_salty", &"sweet".into()).unwrap(), 0.0);
    let m = correlate(&none, &[HOBBY, MOTIVATION, LEARNING_PREF]).unwrap();
    assert!(m.values.iter().flatten().all(Option::is_none));
}

#[test]
fn dashboard_over_filtered_state() {
    let ds = survey();
    let mut state = ExplorerState::new(std::sync::Arc::new(ds));
    state.set_filter("edu_level", "Higher").unwrap();

    let report = state.report(&DashboardOptions::default()).unwrap();
    assert_eq!(report.overview.respondents, 4);
    assert_eq!(report.overview.total_respondents, 6);
    assert_eq!(report.overview.modal_age.as_deref(), Some("25-34"));
    let hobbies: Vec<(&str, usize)> = report
        .hobbies
        .iter()
        .map(|c| (c.label.as_str(), c.count))
        .collect();
    assert_eq!(hobbies, [("Art", 1), ("Sport", 2), ("Books", 3)]);
    let learning: Vec<&str> = report
        .learning_preferences
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(learning, ["Books", "Chatgpt"]);
}

#[test]
fn gender_filter_accepts_code_and_label() {
    let ds = survey();
    let schema = ds.schema();
    assert_eq!(
        FilterCriteria::parse_value(schema, "gender", "0").unwrap(),
        FilterCriteria::parse_value(schema, "gender", "Woman").unwrap()
    );
    let women = apply(
        &ds,
        &FilterCriteria::new().with("gender", FieldValue::Number(0.0)),
    )
    .unwrap();
    assert_eq!(women.len(), 2);
}

#[test]
fn projected_export_reloads_with_same_layout() {
    let ds = survey();
    let narrow = apply(&ds, &FilterCriteria::new().with("sweet_or_salty", "sweet"))
        .unwrap()
        .project(&["gender", "industry", "hobby_books"])
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("narrow.csv");
    export_file(&narrow, &out).unwrap();

    let reloaded = DatasetRepository::load(&out, LoaderOptions::default()).unwrap();
    assert_eq!(*reloaded.dataset(), narrow);
    assert_eq!(narrow.schema().groups().members(HOBBY).unwrap(), &["hobby_books".to_string()]);
}

#[test]
fn dashboard_defaults_work_without_age_column() {
    let ds = survey().project(&["edu_level", "gender", "hobby_art"]).unwrap();
    let report = survey_explorer::dashboard::DashboardReport::compute(
        &ds,
        ds.len(),
        &DashboardOptions::default(),
    )
    .unwrap();
    assert!(report.describe.is_none());
    assert!(report.age_vs_experience.is_none());
    assert_eq!(report.overview.modal_edu_level.as_deref(), Some("Higher"));
}
