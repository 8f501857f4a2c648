use paper_shelf::entities::paper::{Catalog, Paper, UNKNOWN_YEAR};
use paper_shelf::render::markdown::catalog_markdown;
use paper_shelf::sources::catalog::parse_catalog;
use paper_shelf::view::{CatalogView, ViewState, group_by_year, search};

fn catalog(json: &str) -> Catalog {
    Catalog::from_raw(parse_catalog("test", json.as_bytes()).expect("valid catalog"))
}

fn mixed_catalog() -> Catalog {
    catalog(
        r#"[
        {"title": "Smithsonian Study", "authors": "Q", "publication_date": "2019-07-04"},
        {"title": "Graphs", "authors": "John Smith, Jane Doe", "publication_date": "2019-02-01"},
        {"title": "Legacy", "authors": ["Ann Lee"], "year": 2019, "code_link": "https://github.com/a/b"},
        {"title": "Nets", "authors": ["Bo Chen"], "publication_date": "2021-03-15"},
        {"title": "Smith undated", "authors": "Smith", "publication_date": ""},
        {"title": "Garbage date", "authors": "Smith", "publication_date": "soon"},
        {"title": "Late 2021", "authors": "R", "publication_date": "2021-12-01T10:00:00Z"},
        {"title": "Early 2021", "authors": "S", "publication_date": "2021-01-02"}
    ]"#,
    )
}

fn titles(papers: &[&Paper]) -> Vec<String> {
    papers.iter().map(|p| p.title.clone()).collect()
}

#[test]
fn every_dated_record_lands_in_exactly_its_year_bucket() {
    let catalog = mixed_catalog();
    let groups = group_by_year(catalog.papers());

    for paper in catalog.papers() {
        let hits = groups
            .years_desc()
            .into_iter()
            .filter(|year| {
                groups
                    .get(*year)
                    .unwrap_or_default()
                    .iter()
                    .any(|p| std::ptr::eq(*p, paper))
            })
            .collect::<Vec<_>>();
        if paper.year == UNKNOWN_YEAR {
            assert!(hits.is_empty(), "{} should be hidden", paper.title);
        } else {
            assert_eq!(hits, vec![paper.year], "{}", paper.title);
        }
    }
}

#[test]
fn buckets_ascend_and_search_descends() {
    let catalog = mixed_catalog();
    let groups = group_by_year(catalog.papers());
    for year in groups.years_desc() {
        let bucket = groups.get(year).unwrap();
        for pair in bucket.windows(2) {
            assert!(pair[0].date <= pair[1].date);
        }
    }

    let results = search(catalog.papers(), "s");
    assert!(!results.is_empty());
    for pair in results.windows(2) {
        assert!(pair[0].date >= pair[1].date);
    }
}

#[test]
fn legacy_year_only_record_sorts_first_in_its_year() {
    let catalog = mixed_catalog();
    let groups = group_by_year(catalog.papers());
    assert_eq!(
        titles(groups.get(2019).unwrap()),
        vec!["Legacy", "Graphs", "Smithsonian Study"]
    );
    assert_eq!(
        titles(groups.get(2021).unwrap()),
        vec!["Early 2021", "Nets", "Late 2021"]
    );
}

#[test]
fn smith_matches_author_and_title_but_not_undated_records() {
    let catalog = mixed_catalog();
    assert_eq!(
        titles(&search(catalog.papers(), "smith")),
        vec!["Smithsonian Study", "Graphs"]
    );
}

#[test]
fn two_record_example_browses_and_searches() {
    let catalog = catalog(
        r#"[
        {"title": "A", "authors": "X, Y", "publication_date": "2020-01-01"},
        {"title": "B", "authors": "Z", "publication_date": "2021-06-01"}
    ]"#,
    );

    let mut state = ViewState::default();
    state.toggle_year(2020);
    match CatalogView::derive(catalog.papers(), &state) {
        CatalogView::Browse { years, expanded } => {
            assert_eq!(years.iter().map(|y| y.year).collect::<Vec<_>>(), vec![2021, 2020]);
            assert_eq!(titles(&expanded.unwrap().papers), vec!["A"]);
        }
        other => panic!("unexpected view: {other:?}"),
    }

    state.set_query("z");
    match CatalogView::derive(catalog.papers(), &state) {
        CatalogView::Search { results, .. } => assert_eq!(titles(&results), vec!["B"]),
        other => panic!("unexpected view: {other:?}"),
    }

    state.clear_query();
    state.toggle_year(2020);
    assert_eq!(state.expanded_year(), None);
}

#[test]
fn two_artifacts_render_as_disclosure_not_inline_links() {
    let catalog = catalog(
        r#"[{"title": "A", "publication_date": "2020-01-01", "implementation_urls": [
            {"identifier": "https://github.com/org/a", "type": "git"},
            {"identifier": "https://example.org/a", "type": "other-type"}
        ]}]"#,
    );
    let md = catalog_markdown(catalog.papers(), &ViewState::new("", Some(2020)), "Papers").unwrap();
    assert!(md.contains("📦 Artifacts:"));
    assert!(md.contains("[💻 GIT](https://github.com/org/a)"));
    assert!(md.contains("[OTHER-TYPE](https://example.org/a)"));
    assert!(!md.contains("Artifact (other-type)"));
}

#[test]
fn odd_provenance_shapes_do_not_hide_a_paper() {
    let catalog = catalog(
        r#"[
        {"title": "P1", "publication_date": "2020-01-01",
         "implementation_urls": [{"identifier": "https://github.com/a/b", "type": "git", "paper_frequency": 1.5}]},
        {"title": "P2", "publication_date": "2020-02-01",
         "implementation_urls": [{"identifier": "https://github.com/a/c", "type": "git", "extraction_methods": null}]},
        {"title": "P3", "publication_date": "2020-03-01",
         "implementation_urls": [{"identifier": "https://zenodo.org/records/9", "type": null}]},
        {"title": "P4", "authors": ["A", null], "publication_date": "2020-04-01"}
    ]"#,
    );
    assert_eq!(catalog.len(), 4);

    let groups = group_by_year(catalog.papers());
    assert_eq!(
        titles(groups.get(2020).expect("2020 bucket")),
        vec!["P1", "P2", "P3", "P4"]
    );
    assert_eq!(
        titles(&search(catalog.papers(), "p")),
        vec!["P4", "P3", "P2", "P1"]
    );

    let p3 = &catalog.papers()[2];
    assert_eq!(p3.artifacts.len(), 1);
    assert_eq!(p3.artifacts[0].raw_type, "artifact");
    assert_eq!(catalog.papers()[3].authors, vec!["A".to_string()]);
}
