//! Start-up scene showing one of each shape.

use kurbo::Point;
use space2d_core::{Circle, Group, Line, Properties, Rectangle, SceneController, Shape, ShapeId, Text};

/// Add the demo shapes to the controller and return their ids in draw order.
pub fn populate(controller: &mut SceneController) -> Vec<ShapeId> {
    let mut ids = vec![
        controller.add(Circle::new(1.5, Properties::new().with_position(-5.0, 3.0))),
        controller.add(Rectangle::new(3.0, 2.0, Properties::new().with_position(0.0, 3.0))),
        controller.add(Line::new(
            vec![Point::new(-2.0, -1.0), Point::new(0.0, 1.0), Point::new(2.0, -1.0)],
            Properties::new().with_position(5.0, 3.0),
        )),
        controller.add(Text::new("Space2D", Properties::new().with_position(0.0, -2.0))),
    ];

    let members: [Shape; 2] = [
        Circle::new(0.75, Properties::new().with_position(-1.0, 0.0).with_color(0xffa500)).into(),
        Rectangle::new(1.5, 1.5, Properties::new().with_position(1.0, 0.0).with_color(0x00ffff)).into(),
    ];
    ids.push(controller.add(Group::new(
        &members,
        Properties::new().with_position(-5.0, -5.0).with("name", "demo group"),
    )));

    log::info!("Demo scene created with {} shapes", ids.len());
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use space2d_core::ShapeTrait;

    #[test]
    fn test_populate() {
        let mut controller = SceneController::new();
        let ids = populate(&mut controller);

        assert_eq!(ids.len(), 5);
        assert_eq!(controller.scene().len(), 5);
        assert_eq!(controller.scene().ids(), ids.as_slice());
        assert_eq!(controller.selection_len(), 0);

        let group = controller.scene().get_shape(ids[4]).unwrap();
        assert_eq!(group.as_group().map(|g| g.children().len()), Some(2));
        assert_eq!(group.node().transform.position, Point::new(-5.0, -5.0));
    }
}
