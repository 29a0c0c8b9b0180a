use erdraw::diagram::DiagramDocument;
use erdraw::fonts::ApproxMeasure;
use erdraw::layout::layout_nodes;
use erdraw::render::{DiagramRenderer, DiagramStyle};
use erdraw::theme::Theme;

const MEMBERS: &str = include_str!("../demos/members.json");

#[test]
fn members_document_renders_one_edge() {
    let diagram = DiagramDocument::from_json(MEMBERS).expect("demo parses").to_diagram();
    let nodes = layout_nodes::<ApproxMeasure>(&diagram, None);
    let renderer = DiagramRenderer::default();

    let edges = renderer.edges(&diagram, &nodes);
    assert_eq!(edges.len(), 1);

    let edge = &edges[0].render;
    // MEMBERS spans x 160..354, MEMBER_PROFILES starts at x 488
    assert_eq!(edge.anchors.sx, 354.0);
    assert_eq!(edge.anchors.tx, 488.0);

    // 0..n at the parent end, 1..n at the child end: two crowfeet, one circle, one line
    assert_eq!(edge.path.matches(" M ").count(), 3, "{}", edge.path);
    assert_eq!(edge.elements.len(), 1);
    assert_eq!(edge.elements[0].key(), "source-circle-1");
}

#[test]
fn members_document_renders_svg() {
    let diagram = DiagramDocument::from_json(MEMBERS).unwrap().to_diagram();
    let renderer = DiagramRenderer::new(DiagramStyle::from_theme(&Theme::github_light()));
    let svg = renderer.render(&diagram, Some(&mut ApproxMeasure));

    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains(">MEMBER_PROFILES</text>"));
    assert!(svg.contains(">CREATED_AT: datetime</text>"));
    assert!(svg.contains(">LAST_NAME: varchar(0)</text>"));
    assert!(svg.contains(">MEMBER_PROFILE_ID: bigint(0)</text>"));
    assert!(svg.contains(">MEMBER_ID</text>"));
    assert!(svg.contains("data-name=\"FK_MEMBER_PROFILES_MEMBERS\""));
    assert!(svg.contains("fill=\"rgb(128, 128, 192)\""));
}

#[test]
fn moving_a_table_moves_its_edge() {
    let diagram = DiagramDocument::from_json(MEMBERS).unwrap().to_diagram();
    let renderer = DiagramRenderer::default();

    let mut nodes = layout_nodes::<ApproxMeasure>(&diagram, None);
    let before = renderer.edges(&diagram, &nodes)[0].render.clone();

    nodes[1].position.y += 300.0;
    let after = renderer.edges(&diagram, &nodes)[0].render.clone();

    assert_ne!(before.anchors, after.anchors);
    assert!(after.anchors.ty > before.anchors.ty);
}

#[test]
fn dark_theme_switches_edge_stroke() {
    let style = DiagramStyle::from_theme(&Theme::from_builtin("github_dark").unwrap());
    assert_eq!(style.edge_stroke, "#c9d1d9");
}
