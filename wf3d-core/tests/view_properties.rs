use nalgebra::{Point2, Point3, Vector4};
use wf3d_core::{
    batch_from_points, DegenerateInput, Result, VertexBatch, ViewConfig, ViewContext, ViewError,
};

fn default_view() -> ViewContext {
    ViewContext::new(ViewConfig::default()).unwrap()
}

fn sample_points() -> VertexBatch {
    batch_from_points(&[
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(123.5, -42.0, 7.0),
        Point3::new(-800.0, 600.0, -30.0),
        Point3::new(400.0, 400.0, 0.0),
    ])
}

fn assert_close(a: &VertexBatch, b: &VertexBatch, relative: f64) {
    let scale = b.norm().max(1.0);
    assert!(
        (a - b).norm() <= relative * scale,
        "{} vs {} differ by {}",
        a,
        b,
        (a - b).norm()
    );
}

#[test]
fn affine_chain_round_trips() -> Result<()> {
    let mut view = default_view();
    let points = sample_points();

    for step in 0..50 {
        let k = step as f64;
        match step % 3 {
            0 => view.scale(1.0 + 0.1 * (k % 7.0), 0.5 + 0.05 * k)?,
            1 => view.rotate(13.0 * k - 200.0)?,
            _ => view.translate(20.0 - k, 3.5 * k)?,
        }
        let device = view.apply_affine(&points);
        assert_close(&view.unapply_affine(&device), &points, 1e-9);
    }
    Ok(())
}

fn assert_finite_state(view: &ViewContext) {
    for m in [view.to_device(), view.to_model(), view.h_orbit_matrix(), view.v_orbit_matrix()] {
        assert!(m.iter().all(|v| v.is_finite()), "non-finite matrix {}", m);
    }
    let (h, v) = view.orbit_angles();
    assert!(h.is_finite() && v.is_finite());
}

#[test]
fn subnormal_scale_factors_rejected() -> Result<()> {
    let mut view = default_view();
    view.rotate(20.0)?;
    for (a, b) in [(1e-310, 1.0), (1.0, -5e-324), (f64::MIN_POSITIVE / 4.0, 2.0)] {
        let err = view.scale(a, b).unwrap_err();
        assert_eq!(err, ViewError::Degenerate(DegenerateInput::ZeroScale { x: a, y: b }));
    }
    assert_eq!(view.history().len(), 1);
    assert_finite_state(&view);

    let points = sample_points();
    assert_close(&view.unapply_affine(&view.apply_affine(&points)), &points, 1e-9);
    Ok(())
}

#[test]
fn repeated_operations_never_overflow() {
    let overflow = ViewError::Degenerate(DegenerateInput::NonFinite { what: "transform chain" });

    let mut zoomed = default_view();
    let err = (0..2000).find_map(|_| zoomed.scale(2.0, 2.0).err()).unwrap();
    assert_eq!(err, overflow);
    assert!(zoomed.history().len() < 2000);
    assert_finite_state(&zoomed);

    let mut shifted = default_view();
    assert!(shifted.translate(1e308, 0.0).is_ok());
    assert_eq!(shifted.translate(1e308, 0.0), Err(overflow));
    assert_eq!(shifted.history().len(), 1);
    assert_finite_state(&shifted);

    let mut orbited = default_view();
    for _ in 0..200 {
        let _ = orbited.h_orbit(f64::MAX);
        let _ = orbited.v_orbit(-f64::MAX);
    }
    assert!(orbited.h_orbit(f64::MAX).unwrap_err().is_degenerate());
    assert_finite_state(&orbited);
}

#[test]
fn inverse_chain_composes_to_centering() -> Result<()> {
    let mut view = default_view();
    view.rotate(33.0)?;
    view.scale(4.0, 0.25)?;
    view.translate(-20.0, 0.0)?;

    let centered = view.to_model() * view.to_device();
    let expected = nalgebra::Matrix4::new_translation(&nalgebra::Vector3::new(400.0, 400.0, 0.0));
    assert!((centered - expected).norm() < 1e-9);
    Ok(())
}

#[test]
fn reset_restores_initial_output() -> Result<()> {
    let mut view = default_view();
    let center = batch_from_points(&[Point3::new(400.0, 400.0, 0.0)]);
    let initial = view.model_to_device(&center);

    view.scale(2.0, 3.0)?;
    view.rotate(45.0)?;
    view.translate(20.0, -20.0)?;
    view.h_orbit(30.0)?;
    view.v_orbit(-15.0)?;
    assert!((view.model_to_device(&center) - &initial).norm() > 1e-3);

    view.reset();
    assert_close(&view.model_to_device(&center), &initial, 1e-12);
    Ok(())
}

#[test]
fn orbit_accumulates_absolute_angle() -> Result<()> {
    let mut stepped = default_view();
    let mut once = default_view();
    for _ in 0..3 {
        stepped.h_orbit(30.0)?;
        stepped.v_orbit(30.0)?;
    }
    once.h_orbit(90.0)?;
    once.v_orbit(90.0)?;

    assert!((stepped.h_orbit_matrix() - once.h_orbit_matrix()).norm() < 1e-12);
    assert!((stepped.v_orbit_matrix() - once.v_orbit_matrix()).norm() < 1e-12);
    Ok(())
}

#[test]
fn orbit_matrices_are_rotations() -> Result<()> {
    let mut view = default_view();
    view.h_orbit(17.0)?;
    view.v_orbit(-63.0)?;
    for m in [view.h_orbit_matrix(), view.v_orbit_matrix()] {
        let r = m.fixed_view::<3, 3>(0, 0).into_owned();
        assert!((r.determinant() - 1.0).abs() < 1e-12);
        assert!((r * r.transpose() - nalgebra::Matrix3::identity()).norm() < 1e-12);
    }
    Ok(())
}

#[test]
fn projection_leaves_depth_untouched() {
    let view = default_view();
    let mut batch = sample_points();
    let depth = batch.row(2).into_owned();
    view.project(&mut batch);
    assert_eq!(batch.row(2).into_owned(), depth);
}

#[test]
fn scale_and_inverse_scale_cancel() -> Result<()> {
    let mut view = default_view();
    view.translate(20.0, 0.0)?;
    let before = *view.to_device();

    view.scale(2.0, 2.0)?;
    view.scale(0.5, 0.5)?;
    assert!((view.to_device() - before).norm() < 1e-9);
    Ok(())
}

#[test]
fn translated_origin_regression() -> Result<()> {
    let config = ViewConfig::default()
        .with_reference_point(Point3::new(50.0, 50.0, 0.0))
        .with_screen_center(Point2::new(400.0, 400.0))
        .with_field_of_view(1000.0);
    let mut view = ViewContext::new(config)?;
    let origin = batch_from_points(&[Point3::origin()]);

    let centered = view.model_to_device(&origin);
    view.translate(20.0, 0.0)?;
    let device = view.model_to_device(&origin);

    // the origin sits on the view axis, 50·√2 in front of the eye
    let expected = Vector4::new(420.0, 400.0, -100.0 * std::f64::consts::FRAC_1_SQRT_2, 1.0);
    assert!((device.column(0) - expected).norm() < 1e-9);
    assert!((device[(0, 0)] - centered[(0, 0)] - 20.0).abs() < 1e-9);
    Ok(())
}
