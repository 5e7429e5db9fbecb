//! Body diagrams: geometry that paints renderer regions.
//!
//! A diagram only decides shapes. Colors always come from the
//! [`RenderableRegion`]s it is handed, so swapping geometry never changes
//! what a report says.

use crate::core::renderer::{ColorToken, ExpertiseRenderer, RenderableRegion};
use crate::domain::expertise::Panel;

pub trait BodyDiagram: Send + Sync {
    fn name(&self) -> &str;
    fn render_svg(&self, regions: &[RenderableRegion]) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Center,
    Left,
    Right,
}

struct Shape {
    panel: Panel,
    side: Side,
    path: &'static str,
}

const REAR_FENDER: &str = "M275,75 C150,75 150,200 150,260 L220,260 L275,220 Z";
const REAR_DOOR: &str = "M150,265 L220,265 L230,450 L155,470 C150,400 150,350 150,265 Z";
const FRONT_DOOR: &str = "M155,475 L230,455 L245,650 L170,680 C165,600 160,550 155,475 Z";
const FRONT_FENDER: &str = "M170,685 L245,655 L285,860 C200,860 150,800 170,685 Z";
const MIRROR: &str = "M245,620 L280,610 L285,640 L250,650 Z";

// Rear at the top, front at the bottom. The right side reuses the left
// geometry mirrored around the vertical axis.
const SHAPES: &[Shape] = &[
    Shape {
        panel: Panel::RearBumper,
        side: Side::Center,
        path: "M280,40 Q400,10 520,40 L520,70 Q400,100 280,70 Z",
    },
    Shape {
        panel: Panel::Trunk,
        side: Side::Center,
        path: "M285,75 L515,75 C525,150 515,230 505,260 L295,260 C285,230 275,150 285,75 Z",
    },
    Shape {
        panel: Panel::Roof,
        side: Side::Center,
        path: "M295,265 L505,265 L500,600 L300,600 Z",
    },
    Shape {
        panel: Panel::Hood,
        side: Side::Center,
        path: "M300,605 L500,605 C490,750 480,820 470,860 L330,860 C320,820 310,750 300,605 Z",
    },
    Shape {
        panel: Panel::FrontBumper,
        side: Side::Center,
        path: "M325,865 Q400,880 475,865 L485,900 Q400,930 315,900 Z",
    },
    Shape { panel: Panel::RearLeftFender, side: Side::Left, path: REAR_FENDER },
    Shape { panel: Panel::RearLeftDoor, side: Side::Left, path: REAR_DOOR },
    Shape { panel: Panel::FrontLeftDoor, side: Side::Left, path: FRONT_DOOR },
    Shape { panel: Panel::FrontLeftFender, side: Side::Left, path: FRONT_FENDER },
    Shape { panel: Panel::RearRightFender, side: Side::Right, path: REAR_FENDER },
    Shape { panel: Panel::RearRightDoor, side: Side::Right, path: REAR_DOOR },
    Shape { panel: Panel::FrontRightDoor, side: Side::Right, path: FRONT_DOOR },
    Shape { panel: Panel::FrontRightFender, side: Side::Right, path: FRONT_FENDER },
];

/// Top-down view of the car, the layout used on the listing detail page.
#[derive(Debug, Clone, Copy)]
pub struct TopDownDiagram {
    legend: bool,
}

impl Default for TopDownDiagram {
    fn default() -> Self {
        Self { legend: true }
    }
}

impl TopDownDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_legend() -> Self {
        Self { legend: false }
    }

    fn group(&self, side: Side, regions: &[RenderableRegion]) -> String {
        let (id, transform) = match side {
            Side::Center => ("center-column", ""),
            Side::Left => ("left-side", r#" transform="translate(-10, 0)""#),
            Side::Right => ("right-side", r#" transform="scale(-1, 1) translate(-800, 0)""#),
        };

        let mut out = format!("<g id=\"{}\"{}>", id, transform);
        for shape in SHAPES.iter().filter(|s| s.side == side) {
            let color = regions
                .iter()
                .find(|r| r.panel == shape.panel)
                .map(|r| r.color)
                .unwrap_or(ColorToken::Neutral);
            out.push_str(&format!(
                "<path id=\"{}\" class=\"{}\" fill=\"{}\" d=\"{}\"><title>{}</title></path>",
                shape.panel.diagram_id(),
                color.css_class(),
                color.hex(),
                shape.path,
                shape.panel.label()
            ));
        }
        if side != Side::Center {
            out.push_str(&format!(
                "<path d=\"{}\" fill=\"#e5e7eb\" stroke=\"none\"/>",
                MIRROR
            ));
        }
        out.push_str("</g>");
        out
    }

    fn legend_row(&self) -> String {
        let mut out = String::from("<g id=\"legend\" stroke=\"none\">");
        for (i, entry) in ExpertiseRenderer::new().legend().iter().enumerate() {
            let x = 120 + i as u32 * 150;
            out.push_str(&format!(
                "<rect x=\"{}\" y=\"975\" width=\"24\" height=\"24\" rx=\"4\" fill=\"{}\"/>\
                 <text x=\"{}\" y=\"993\" font-size=\"20\" fill=\"#374151\">{}</text>",
                x,
                entry.color.hex(),
                x + 32,
                entry.label
            ));
        }
        out.push_str("</g>");
        out
    }
}

impl BodyDiagram for TopDownDiagram {
    fn name(&self) -> &str {
        "top-down"
    }

    fn render_svg(&self, regions: &[RenderableRegion]) -> String {
        let mut svg = String::from(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 800 1050\" width=\"100%\">",
        );
        svg.push_str("<g stroke=\"#9ca3af\" stroke-width=\"3\" stroke-linejoin=\"round\">");
        for side in [Side::Center, Side::Left, Side::Right] {
            svg.push_str(&self.group(side, regions));
        }
        svg.push_str("</g>");
        if self.legend {
            svg.push_str(&self.legend_row());
        }
        svg.push_str("</svg>");
        svg
    }
}
