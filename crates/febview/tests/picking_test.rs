//! Integration tests for point picking, highlighting and mouse selection.
//!
//! Every test looks straight down -z with an orthographic camera: world
//! `(x, y)` lands on pixel `(300 + 100 x, 300 - 100 y)`.

use febview::*;

fn bar(n: usize) -> FeMesh {
    let mut fe = FeMesh::new();
    for i in 0..=n {
        #[allow(clippy::cast_precision_loss)]
        let x = i as f64;
        fe.add_node(DVec3::new(x, 0.0, 0.0));
        fe.add_node(DVec3::new(x, 1.0, 0.0));
        fe.add_node(DVec3::new(x, 1.0, 1.0));
        fe.add_node(DVec3::new(x, 0.0, 1.0));
    }
    for i in 0..n {
        let (a, b) = (4 * i, 4 * (i + 1));
        fe.add_element(
            ElementType::Hex8,
            vec![a, b, b + 1, a + 1, a + 3, b + 3, b + 2, a + 2],
            0,
        )
        .expect("valid hex");
    }
    fe
}

fn document(model: Model) -> Document {
    let mut doc = Document::new(model);
    doc.camera = Camera {
        position: DVec3::new(0.0, 0.0, 10.0),
        target: DVec3::ZERO,
        projection_mode: ProjectionMode::Orthographic,
        ortho_scale: 3.0,
        ..Camera::default()
    };
    doc
}

fn bar_view() -> View {
    let mut model = Model::new();
    model.add_object(Object::from_fe_mesh("bar", bar(3)));
    let mut view = View::new(600, 600);
    view.set_document(Some(document(model)));
    view
}

#[allow(clippy::cast_possible_truncation)]
fn px(x: f64, y: f64) -> (i32, i32) {
    ((300.0 + 100.0 * x).round() as i32, (300.0 - 100.0 * y).round() as i32)
}

fn selected_elements(view: &View) -> Vec<bool> {
    let doc = view.document().expect("document");
    doc.model.objects()[0]
        .fe_mesh
        .as_ref()
        .expect("mesh")
        .elements()
        .iter()
        .map(|e| e.selected)
        .collect()
}

fn close(a: DVec3, b: DVec3) -> bool {
    (a - b).length() < 1e-9
}

#[test]
fn test_pick_empty_model() {
    let mut view = View::new(600, 600);
    view.set_document(Some(document(Model::new())));
    view.document_mut().unwrap().settings.grid_picking = false;
    let (x, y) = px(0.3, 0.3);
    assert!(view.pick_point(x, y).is_none());

    // the construction grid catches the ray and snaps it
    view.document_mut().unwrap().settings.grid_picking = true;
    let hit = view.pick_point(x, y).expect("grid hit");
    assert!(close(hit, DVec3::ZERO));
    assert_eq!(view.document().unwrap().cursor, hit);
}

#[test]
fn test_pick_active_mesh() {
    let mut view = bar_view();
    view.document_mut().unwrap().set_active_object(Some(0));

    let (x, y) = px(1.5, 0.5);
    let hit = view.pick_point(x, y).expect("mesh hit");
    assert!(close(hit, DVec3::new(1.5, 0.5, 1.0)));
    assert!(close(view.document().unwrap().cursor, hit));

    // missing the active mesh does not fall through to the grid
    let (x, y) = px(-2.0, -2.0);
    assert!(view.pick_point(x, y).is_none());
}

#[test]
fn test_pick_snaps_to_node() {
    let mut view = bar_view();
    let doc = view.document_mut().unwrap();
    doc.set_active_object(Some(0));
    doc.settings.snap_to_node = true;

    let (x, y) = px(1.4, 0.3);
    let hit = view.pick_point(x, y).expect("mesh hit");
    assert_eq!(hit, DVec3::new(1.0, 0.0, 1.0));
}

#[test]
fn test_pick_follows_object_transform() {
    let mut view = bar_view();
    let doc = view.document_mut().unwrap();
    doc.set_active_object(Some(0));
    doc.model.objects_mut()[0].transform = Transform::from_translation(DVec3::new(0.0, 1.0, 0.0));

    let (x, y) = px(0.5, 1.5);
    let hit = view.pick_point(x, y).expect("mesh hit");
    assert!(close(hit, DVec3::new(0.5, 1.5, 1.0)));
}

#[test]
fn test_pick_invisible_mesh() {
    let mut view = bar_view();
    let doc = view.document_mut().unwrap();
    doc.set_active_object(Some(0));
    let fe = doc.model.objects_mut()[0].fe_mesh.as_mut().unwrap();
    for el in fe.elements_mut() {
        el.visible = false;
    }
    fe.update_item_visibility();

    let (x, y) = px(1.5, 0.5);
    assert!(view.pick_point(x, y).is_none());
}

#[test]
fn test_pick_hidden_object() {
    let mut view = bar_view();
    view.document_mut().unwrap().set_active_object(Some(0));
    let (x, y) = px(1.5, 0.5);
    assert!(view.pick_point(x, y).is_some());

    view.set_object_visible(0, false);
    assert!(view.pick_point(x, y).is_none());
    // the cursor keeps the last successful pick
    assert!(close(view.document().unwrap().cursor, DVec3::new(1.5, 0.5, 1.0)));
}

#[test]
fn test_pick_hidden_part() {
    let mut fe = bar(3);
    fe.elements_mut()[2].part = 1;
    let mut model = Model::new();
    model.add_object(Object::from_fe_mesh("bar", fe));
    let mut view = View::new(600, 600);
    view.set_document(Some(document(model)));

    let doc = view.document_mut().unwrap();
    doc.set_active_object(Some(0));
    doc.model.objects_mut()[0].parts[0].visible = false;

    // elements 0 and 1 belong to the hidden part
    let (x, y) = px(1.5, 0.5);
    assert!(view.pick_point(x, y).is_none());
    let (x, y) = px(2.5, 0.5);
    let hit = view.pick_point(x, y).expect("visible part");
    assert!(close(hit, DVec3::new(2.5, 0.5, 1.0)));
}

#[test]
fn test_pick_temp_object_first() {
    let mut view = bar_view();
    let mut temp = Object::new("sketch");
    for z in [-1.0, 1.0] {
        temp.nodes.push(GeoNode {
            position: DVec3::new(0.5, 0.5, z),
            visible: true,
            selected: false,
        });
    }
    let doc = view.document_mut().unwrap();
    doc.set_active_object(Some(0));
    doc.temp_object = Some(temp);

    // within the tolerance box, nearest to the camera
    let (x, y) = px(0.5, 0.5);
    let hit = view.pick_point(x + 3, y - 2).expect("temp node");
    assert_eq!(hit, DVec3::new(0.5, 0.5, 1.0));
}

#[test]
fn test_highlight_edge() {
    let mut view = bar_view();
    let (x, y) = px(0.5, 1.0);
    let item = view.highlight_edge(x, y).expect("edge under cursor");
    assert_eq!(item.kind, HighlightKind::Edge);
    assert_eq!(view.highlight(), Some(item));

    // the edge in front is the one on top of the bar at z = 1
    let doc = view.document().unwrap();
    let fe = doc.model.objects()[0].fe_mesh.as_ref().unwrap();
    let [a, b] = fe.edges()[item.index].nodes;
    for n in [a, b] {
        let p = fe.nodes()[n].position;
        assert_eq!((p.y, p.z), (1.0, 1.0));
    }

    // nothing under the cursor clears the highlight
    let (x, y) = px(0.5, 2.0);
    assert!(view.highlight_edge(x, y).is_none());
    assert!(view.highlight().is_none());
}

#[test]
fn test_highlight_without_items() {
    let mut view = View::new(600, 600);
    view.set_document(Some(document(Model::new())));
    assert!(view.highlight_edge(300, 300).is_none());
    assert!(view.highlight_node(300, 300).is_none());

    // objects built from meshes carry no geometry nodes
    let mut view = bar_view();
    let (x, y) = px(1.0, 1.0);
    assert!(view.highlight_node(x, y).is_none());

    let doc = view.document_mut().unwrap();
    doc.model.objects_mut()[0].nodes.push(GeoNode {
        position: DVec3::new(1.0, 1.0, 1.0),
        visible: true,
        selected: false,
    });
    let item = view.highlight_node(x, y).expect("node under cursor");
    assert_eq!((item.object, item.index), (0, 0));
    assert_eq!(item.kind, HighlightKind::Node);
}

#[test]
fn test_drag_selects_elements() {
    let mut view = bar_view();
    let doc = view.document_mut().unwrap();
    doc.set_active_object(Some(0));
    doc.selection_target = SelectionTarget::Element;

    let (x0, y0) = px(-0.2, 1.2);
    let (x1, y1) = px(1.2, -0.2);
    view.mouse_press(x0, y0);
    view.mouse_move(x0 + 10, y0 + 10);
    let result = view.mouse_release(x1, y1, Modifiers::default());
    assert_eq!(result.changed, 2);
    assert!(result.picked.is_none());
    assert_eq!(selected_elements(&view), vec![true, true, false]);

    // ctrl-drag over the first column removes element 0 only
    let (x0, y0) = px(-0.2, 1.2);
    let (x1, y1) = px(0.2, -0.2);
    view.mouse_press(x0, y0);
    let ctrl = Modifiers {
        shift: false,
        ctrl: true,
    };
    assert_eq!(view.mouse_release(x1, y1, ctrl).changed, 1);
    assert_eq!(selected_elements(&view), vec![false, true, false]);
}

#[test]
fn test_click_selects_and_picks() {
    let mut view = bar_view();
    let doc = view.document_mut().unwrap();
    doc.set_active_object(Some(0));
    doc.selection_target = SelectionTarget::Element;

    let (x, y) = px(2.5, 0.5);
    view.mouse_press(x, y);
    let result = view.mouse_release(x, y, Modifiers::default());
    assert_eq!(result.changed, 1);
    assert!(close(result.picked.expect("picked"), DVec3::new(2.5, 0.5, 1.0)));
    assert_eq!(selected_elements(&view), vec![false, false, true]);

    // shift-click adds
    let (x, y) = px(0.5, 0.5);
    view.mouse_press(x, y);
    let shift = Modifiers {
        shift: true,
        ctrl: false,
    };
    assert_eq!(view.mouse_release(x, y, shift).changed, 1);
    assert_eq!(selected_elements(&view), vec![true, false, true]);

    // a plain click on empty space clears
    let (x, y) = px(0.5, 2.5);
    view.mouse_press(x, y);
    let result = view.mouse_release(x, y, Modifiers::default());
    assert_eq!(result.changed, 2);
    assert!(result.picked.is_none());
    assert_eq!(selected_elements(&view), vec![false, false, false]);
}

#[test]
fn test_circle_and_freehand_gestures() {
    let mut view = bar_view();
    let doc = view.document_mut().unwrap();
    doc.set_active_object(Some(0));
    doc.selection_target = SelectionTarget::FeNode;
    doc.settings.region_style = RegionStyle::Circle;

    // circle around (3, 0) reaching 0.3 units: the two end nodes at y = 0
    let (cx, cy) = px(3.0, 0.0);
    view.mouse_press(cx, cy);
    let result = view.mouse_release(cx + 30, cy, Modifiers::default());
    assert_eq!(result.changed, 2);

    // a lasso around the x = 0 column
    view.document_mut().unwrap().settings.region_style = RegionStyle::Freehand;
    let lasso = [(-0.3, -0.3), (0.3, -0.3), (0.3, 1.3), (-0.3, 1.3)];
    let (x0, y0) = px(lasso[0].0, lasso[0].1);
    view.mouse_press(x0, y0);
    for &(x, y) in &lasso[1..] {
        let (x, y) = px(x, y);
        view.mouse_move(x, y);
    }
    let result = view.mouse_release(x0 + 1, y0, Modifiers::default());
    // the lasso takes the four x = 0 nodes and drops the two end nodes
    assert_eq!(result.changed, 6);

    let doc = view.document().unwrap();
    let fe = doc.model.objects()[0].fe_mesh.as_ref().unwrap();
    for node in fe.nodes() {
        assert_eq!(node.selected, node.position.x == 0.0);
    }
}

#[test]
fn test_object_selection_ignores_active_object() {
    let mut model = Model::new();
    model.add_object(Object::from_fe_mesh("bar", bar(1)));
    let mut other = Object::from_fe_mesh("other", bar(1));
    other.transform = Transform::from_translation(DVec3::new(-2.0, 0.0, 0.0));
    model.add_object(other);

    let mut view = View::new(600, 600);
    view.set_document(Some(document(model)));

    let (x0, y0) = px(-2.5, -0.5);
    let (x1, y1) = px(1.5, 1.5);
    view.mouse_press(x0, y0);
    assert_eq!(view.mouse_release(x1, y1, Modifiers::default()).changed, 2);
    let doc = view.document().unwrap();
    assert!(doc.model.objects().iter().all(|o| o.selected));
}
