mod renderer;

pub use renderer::Renderer;

use super::frame::{LOGICAL_HEIGHT, LOGICAL_WIDTH};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Viewport {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScalePlacement {
    pub(crate) scale: u32,
    pub(crate) offset_x: u32,
    pub(crate) offset_y: u32,
}

/// Largest whole-number upscale of the logical frame that fits the viewport,
/// centered. `None` when the window is smaller than one logical frame.
pub(crate) fn integer_placement(viewport: Viewport) -> Option<ScalePlacement> {
    let scale = (viewport.width / LOGICAL_WIDTH).min(viewport.height / LOGICAL_HEIGHT);
    if scale == 0 {
        return None;
    }
    Some(ScalePlacement {
        scale,
        offset_x: (viewport.width - LOGICAL_WIDTH * scale) / 2,
        offset_y: (viewport.height - LOGICAL_HEIGHT * scale) / 2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_picks_largest_fitting_scale() {
        let placement = integer_placement(Viewport {
            width: 768,
            height: 720,
        })
        .expect("placement");
        assert_eq!(placement.scale, 3);
        assert_eq!(placement.offset_x, 0);
        assert_eq!(placement.offset_y, 0);
    }

    #[test]
    fn placement_centers_letterboxed_frame() {
        let placement = integer_placement(Viewport {
            width: 1280,
            height: 720,
        })
        .expect("placement");
        assert_eq!(placement.scale, 3);
        assert_eq!(placement.offset_x, (1280 - 768) / 2);
        assert_eq!(placement.offset_y, 0);
    }

    #[test]
    fn placement_none_when_window_smaller_than_logical_frame() {
        assert_eq!(
            integer_placement(Viewport {
                width: 200,
                height: 720
            }),
            None
        );
        assert_eq!(
            integer_placement(Viewport {
                width: 768,
                height: 100
            }),
            None
        );
    }
}
