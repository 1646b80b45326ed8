//! Integration tests for the plane cut state kept by the view.

use febview::*;
use proptest::prelude::*;

/// A row of `n` unit hexahedra along +x.
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

fn bar_view() -> View {
    let mut model = Model::new();
    model.add_object(Object::from_fe_mesh("bar", bar(3)));
    let mut view = View::new(600, 600);
    view.set_document(Some(Document::new(model)));
    view
}

fn element_visibility(view: &View) -> Vec<bool> {
    let doc = view.document().expect("document");
    doc.model.objects()[0]
        .fe_mesh
        .as_ref()
        .expect("mesh")
        .elements()
        .iter()
        .map(|e| e.visible)
        .collect()
}

#[test]
fn test_plane_cut_lifecycle() {
    let mut view = bar_view();
    assert!(!view.show_plane_cut());
    assert!(view.plane_cut_mesh().is_none());

    view.set_show_plane_cut(true);
    view.set_plane_cut([1.0, 0.0, 0.0, 0.0]);
    assert_eq!(view.plane().offset, 1.5);

    let cut = view.plane_cut_mesh().expect("cut mesh");
    assert_eq!(cut.faces.len(), 2);
    assert_eq!(cut.edges.len(), 4);
    for face in &cut.faces {
        assert_eq!(face.element, 1);
        assert!(face.positions.iter().all(|p| (p.x - 1.5).abs() < 1e-12));
        assert_eq!(face.colors, [[200, 200, 200, 255]; 3]);
    }
    assert_eq!(cut.bounds().r0(), DVec3::new(1.5, 0.0, 0.0));
    assert_eq!(cut.vertices().len(), 6);

    view.delete_plane_cut_mesh();
    assert!(view.plane_cut_mesh().is_none());
    view.update_plane_cut(false);
    assert!(view.plane_cut_mesh().is_some());

    view.set_show_plane_cut(false);
    assert!(view.plane_cut_mesh().is_none());
}

#[test]
fn test_hide_elements_mode() {
    let mut view = bar_view();
    view.set_plane_cut_mode(PlaneCutMode::HideElements);
    view.set_show_plane_cut(true);
    view.set_plane_cut([1.0, 0.0, 0.0, 0.0]);

    assert!(view.plane_cut_mesh().is_none());
    assert_eq!(element_visibility(&view), vec![false, false, true]);

    // faces left without a visible element are hidden as well
    let doc = view.document().unwrap();
    let fe = doc.model.objects()[0].fe_mesh.as_ref().unwrap();
    let shown = fe.faces().iter().filter(|f| f.visible).count();
    assert_eq!(shown, 6);

    // moving the plane back re-evaluates every element
    view.set_plane_cut([1.0, 0.0, 0.0, -1.0]);
    assert_eq!(element_visibility(&view), vec![true, true, true]);

    // switching modes resets visibility and builds the cut mesh
    view.set_plane_cut([1.0, 0.0, 0.0, 0.0]);
    view.set_plane_cut_mode(PlaneCutMode::PlaneCut);
    assert_eq!(element_visibility(&view), vec![true, true, true]);
    assert_eq!(view.plane_cut_mesh().map(|m| m.faces.len()), Some(2));

    view.set_plane_cut_mode(PlaneCutMode::HideElements);
    view.set_show_plane_cut(false);
    assert_eq!(element_visibility(&view), vec![true, true, true]);
}

#[test]
fn test_degenerate_plane() {
    let mut view = bar_view();
    view.set_show_plane_cut(true);
    view.set_plane(CutPlane::new(DVec3::ZERO, 0.5));
    let cut = view.plane_cut_mesh().expect("cut mesh");
    assert!(cut.is_empty());
    assert!(cut.edges.is_empty());
}

#[test]
fn test_empty_document() {
    let mut view = View::new(600, 600);
    view.set_document(Some(Document::new(Model::new())));
    view.set_show_plane_cut(true);
    view.set_plane_cut([0.0, 0.0, 1.0, 0.0]);
    assert!(view.plane_cut_mesh().is_none());
    assert_eq!(view.plane().offset, 0.0);
}

#[test]
fn test_selection_updates_cut() {
    let mut view = bar_view();
    let doc = view.document_mut().unwrap();
    doc.set_active_object(Some(0));
    doc.selection_target = SelectionTarget::Element;
    doc.camera = Camera {
        position: DVec3::new(0.0, 0.0, 10.0),
        target: DVec3::ZERO,
        projection_mode: ProjectionMode::Orthographic,
        ortho_scale: 3.0,
        ..Camera::default()
    };

    view.set_show_plane_cut(true);
    view.set_plane_cut([1.0, 0.0, 0.0, 0.0]);
    assert!(view.plane_cut_mesh().unwrap().faces.iter().all(|f| !f.selected));

    // click the top of the middle element at world (1.5, 0.5)
    view.mouse_press(450, 250);
    assert_eq!(view.mouse_release(450, 250, Modifiers::default()).changed, 1);

    let cut = view.plane_cut_mesh().unwrap();
    assert!(cut.faces.iter().all(|f| f.selected));
    assert!(cut.edges.iter().all(|e| e.selected));
    assert!(cut
        .faces
        .iter()
        .all(|f| f.colors == [[255, 0, 0, 255]; 3]));
}

#[test]
fn test_contour_colors() {
    let mut view = bar_view();
    let doc = view.document_mut().unwrap();
    doc.set_active_object(Some(0));
    doc.settings.show_contour = true;

    // value 0 on the x = 1 side of the middle element, 1 on the x = 2 side
    let mut data = MeshData::new(3);
    data.set_element_values(1, vec![0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0])
        .unwrap();
    let fe = doc.model.objects_mut()[0].fe_mesh.as_mut().unwrap();
    fe.set_data(data).unwrap();

    view.set_show_plane_cut(true);
    view.set_plane_cut([1.0, 0.0, 0.0, 0.0]);

    // halfway between blue and red of the rainbow map, truncated
    let cut = view.plane_cut_mesh().unwrap();
    assert_eq!(cut.faces.len(), 2);
    for face in &cut.faces {
        assert_eq!(face.colors, [[127, 0, 127, 255]; 3]);
    }

    // without an active object the cut falls back to flat colors
    view.document_mut().unwrap().set_active_object(None);
    view.update_plane_cut(false);
    for face in &view.plane_cut_mesh().unwrap().faces {
        assert_eq!(face.colors, [[200, 200, 200, 255]; 3]);
    }
}

#[test]
fn test_setters_rebuild_cut() {
    let mut view = bar_view();
    let mut data = MeshData::new(3);
    data.set_element_values(1, vec![0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0])
        .unwrap();
    let doc = view.document_mut().unwrap();
    let fe = doc.model.objects_mut()[0].fe_mesh.as_mut().unwrap();
    fe.set_data(data).unwrap();

    view.set_show_plane_cut(true);
    view.set_plane_cut([1.0, 0.0, 0.0, 0.0]);
    let flat = [[200, 200, 200, 255]; 3];
    let contour = [[127, 0, 127, 255]; 3];
    let colors = |view: &View| -> Vec<[[u8; 4]; 3]> {
        view.plane_cut_mesh()
            .map(|m| m.faces.iter().map(|f| f.colors).collect())
            .unwrap_or_default()
    };
    assert_eq!(colors(&view), vec![flat; 2]);

    // contours need both the toggle and an active object
    view.set_show_contour(true);
    assert!(view.document().unwrap().settings.show_contour);
    assert_eq!(colors(&view), vec![flat; 2]);
    view.set_active_object(Some(0));
    assert_eq!(colors(&view), vec![contour; 2]);
    view.set_show_contour(false);
    assert_eq!(colors(&view), vec![flat; 2]);
    view.set_show_contour(true);
    view.set_active_object(None);
    assert_eq!(colors(&view), vec![flat; 2]);

    // hiding the object empties the cut, showing it brings it back
    view.set_object_visible(0, false);
    assert!(view.plane_cut_mesh().expect("cut mesh").is_empty());
    view.set_object_visible(0, true);
    assert_eq!(view.plane_cut_mesh().map(|m| m.faces.len()), Some(2));

    // unknown objects are ignored
    view.set_object_visible(7, false);
    assert_eq!(view.plane_cut_mesh().map(|m| m.faces.len()), Some(2));
}

#[test]
fn test_settings_colors() {
    let mut view = bar_view();
    let json = r#"{ "default_color": [0.0, 0.0, 1.0] }"#;
    view.document_mut().unwrap().settings = ViewSettings::from_json(json).unwrap();

    view.set_show_plane_cut(true);
    view.set_plane_cut([1.0, 0.0, 0.0, 0.0]);
    for face in &view.plane_cut_mesh().unwrap().faces {
        assert_eq!(face.colors, [[0, 0, 255, 255]; 3]);
    }
}

proptest! {
    #[test]
    fn test_cut_stays_inside_model(t in -0.99f64..0.99, nx in 0.2f64..1.0, ny in -1.0f64..1.0) {
        let mut view = bar_view();
        view.set_show_plane_cut(true);
        view.set_plane_cut([nx, ny, 0.3, t]);

        let plane = view.plane();
        let cut = view.plane_cut_mesh().expect("cut mesh");
        for face in &cut.faces {
            prop_assert!(face.object == 0 && face.element < 3);
            for p in face.positions {
                prop_assert!((plane.value(p) - plane.offset).abs() < 1e-9);
                prop_assert!(p.x > -1e-4 && p.x < 3.0 + 1e-4);
            }
        }
        // every outline edge lies on the plane too
        for edge in &cut.edges {
            for p in edge.positions {
                prop_assert!((plane.value(p) - plane.offset).abs() < 1e-9);
            }
        }
    }
}
