use worksheet_layout::*;

fn problems(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{i} + {i} =")).collect()
}

/// Two columns of six slots, header taking two slots of each first-page column
fn two_column_template() -> LayoutTemplate {
    LayoutTemplate {
        name: "two-column-test".to_string(),
        columns: 2,
        column_gap_mm: 6.35,
        problem_height_mm: 20.0,
        problem_spacing_mm: 20.0,
        fonts: FontTiers {
            body_pt: 10.0,
            ..LayoutTemplate::elementary().fonts
        },
        ..LayoutTemplate::elementary()
    }
}

#[test]
fn test_two_column_capacity() {
    let template = two_column_template();
    template.validate().unwrap();
    let geometry = template.geometry();
    assert_eq!(geometry.slots_per_column, 6);
    assert_eq!(geometry.header_slots, 2);
}

#[test]
fn test_twenty_problems_split_across_two_pages() {
    let pages = paginate(&problems(20), &two_column_template()).unwrap();
    assert_eq!(pages.len(), 2);

    assert_eq!(pages[0].numbers(), (1..=8).collect::<Vec<_>>());
    assert_eq!(pages[1].numbers(), (9..=20).collect::<Vec<_>>());

    let first_column: Vec<usize> = pages[0]
        .placements
        .iter()
        .filter(|p| p.column == 0)
        .map(|p| p.number)
        .collect();
    assert_eq!(first_column, vec![1, 2, 3, 4]);
    assert!(pages[0].placements.iter().all(|p| p.slot >= 2));
    assert_eq!(pages[1].placements[0].slot, 0);
    assert_eq!(pages[1].placements[6].column, 1);
}

#[test]
fn test_numbering_is_continuous() {
    let pages = paginate(&problems(57), &LayoutTemplate::advanced()).unwrap();
    let numbers: Vec<usize> = pages.iter().flat_map(|p| p.numbers()).collect();
    assert_eq!(numbers, (1..=57).collect::<Vec<_>>());

    let indices: Vec<usize> = pages
        .iter()
        .flat_map(|p| p.placements.iter().map(|pl| pl.problem_index))
        .collect();
    assert_eq!(indices, (0..57).collect::<Vec<_>>());
}

#[test]
fn test_pagination_is_deterministic() {
    let input = problems(33);
    let template = LayoutTemplate::elementary();
    let first = paginate(&input, &template).unwrap();
    let second = paginate(&input, &template).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_only_first_page_loses_header_slots() {
    let template = LayoutTemplate::elementary();
    let geometry = template.geometry();
    let pages = paginate(&problems(25), &template).unwrap();

    let per_page = geometry.slots_per_column;
    assert_eq!(pages[0].placements.len(), per_page - geometry.header_slots);
    assert_eq!(pages[1].placements.len(), per_page);
}

#[test]
fn test_placements_never_overlap() {
    let mut input = problems(12);
    input.insert(4, (0..12).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n"));
    let template = LayoutTemplate::elementary();
    let geometry = template.geometry();
    let pages = paginate(&input, &template).unwrap();

    for page in &pages {
        for column in 0..geometry.columns {
            let mut used: Vec<(usize, usize)> = page
                .placements
                .iter()
                .filter(|p| p.column == column)
                .map(|p| (p.slot, p.slot + p.slots))
                .collect();
            used.sort();
            for pair in used.windows(2) {
                assert!(pair[0].1 <= pair[1].0);
            }
            assert!(used.iter().all(|(_, end)| *end <= geometry.slots_per_column));
        }
    }
    let tall = pages
        .iter()
        .flat_map(|p| p.placements.iter())
        .find(|p| p.problem_index == 4)
        .unwrap();
    assert!(tall.slots > 1);
    assert_eq!(tall.lines.len(), 12);
}

#[test]
fn test_oversized_problem_is_rejected() {
    let mut input = problems(5);
    input.insert(3, vec!["x"; 100].join("\n"));

    match paginate(&input, &LayoutTemplate::elementary()) {
        Err(LayoutError::LayoutOverflow {
            problem_index,
            required_pt,
            available_pt,
        }) => {
            assert_eq!(problem_index, 3);
            assert!(required_pt > available_pt);
        }
        other => panic!("Expected LayoutOverflow, got {other:?}"),
    }
}

#[test]
fn test_roles_and_duplex_padding() {
    let template = LayoutTemplate::elementary();
    // 8 on the header page, 10 on the second, 1 on a third
    let pages = paginate(&problems(19), &template).unwrap();
    assert_eq!(pages.len(), 4);
    assert_eq!(pages[0].role, PageRole::FrontHeader);
    assert_eq!(pages[1].role, PageRole::Back);
    assert_eq!(pages[2].role, PageRole::FrontContinuation);
    assert_eq!(pages[3].role, PageRole::Back);
    assert!(pages[3].placements.is_empty());

    let simplex = LayoutTemplate {
        duplex: false,
        ..template
    };
    assert_eq!(paginate(&problems(19), &simplex).unwrap().len(), 3);
}

#[test]
fn test_worksheet_header_and_labels() {
    let spec = WorksheetSpec::new("k", "Quadratic Equations", problems(30));
    let template = LayoutTemplate::advanced();
    let pages = paginate_worksheet(&spec, &template).unwrap();

    let header = pages[0].header.as_ref().unwrap();
    assert_eq!(header.level, "K");
    assert_eq!(header.topic, "Quadratic Equations");
    assert_eq!(header.student_fields, vec!["Time", "Date", "Name"]);
    assert!(pages[1..].iter().all(|p| p.header.is_none()));

    assert_eq!(pages[0].label.as_deref(), Some("K 1 a"));
    assert_eq!(pages[1].label.as_deref(), Some("K 1 b"));
    if pages.len() > 2 {
        assert_eq!(pages[2].label.as_deref(), Some("K 2 a"));
    }
}
