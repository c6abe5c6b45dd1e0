use super::*;

#[test]
fn positive_rects_normalise_to_themselves() {
    let rect = Rect {
        x: 1.0,
        y: 2.0,
        width: 3.0,
        height: 4.0,
    };
    assert_eq!(rect.normalised(), rect);
}

#[test]
fn negative_extents_fold_back() {
    let rect = Rect {
        x: 10.0,
        y: 10.0,
        width: -4.0,
        height: -2.0,
    };
    let normalised = rect.normalised();
    assert_eq!(
        normalised,
        Rect {
            x: 6.0,
            y: 8.0,
            width: 4.0,
            height: 2.0,
        }
    );
}

#[test]
fn intersection_clamps_to_the_overlap() {
    let viewport = Rect {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 50.0,
    };
    let clip = Rect {
        x: 80.0,
        y: 40.0,
        width: 40.0,
        height: 40.0,
    };
    assert_eq!(
        viewport.intersection(clip),
        Rect {
            x: 80.0,
            y: 40.0,
            width: 20.0,
            height: 10.0,
        }
    );
}

#[test]
fn disjoint_rects_intersect_empty() {
    let a = Rect {
        x: 0.0,
        y: 0.0,
        width: 10.0,
        height: 10.0,
    };
    let b = Rect {
        x: 20.0,
        y: 20.0,
        width: 5.0,
        height: 5.0,
    };
    assert!(a.intersection(b).is_empty());
}
