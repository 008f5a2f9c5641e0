use foundation::math::Ecef;

use super::{Color, LabelStyle};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointMarker {
    pub position: Ecef,
    pub color: Color,
    pub pixel_size: f32,
}

/// Vertical cylinder bisected by its position: it spans `length / 2` below and
/// above `position`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CylinderShape {
    pub position: Ecef,
    pub length: f64,
    pub radius: f64,
    pub fill: Color,
    pub outline: Option<Color>,
}

/// Polygon footprint. With both heights set it is extruded between them;
/// otherwise it is a flat ground overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub vertices: Vec<Ecef>,
    pub height: Option<f64>,
    pub extruded_height: Option<f64>,
    pub fill: Color,
    pub outline: Option<Color>,
    pub outline_width: f32,
}

impl PolygonShape {
    pub fn flat(vertices: Vec<Ecef>, fill: Color) -> Self {
        Self {
            vertices,
            height: None,
            extruded_height: None,
            fill,
            outline: None,
            outline_width: 1.0,
        }
    }

    pub fn extruded(vertices: Vec<Ecef>, bottom: f64, top: f64, fill: Color) -> Self {
        Self {
            vertices,
            height: Some(bottom),
            extruded_height: Some(top),
            fill,
            outline: None,
            outline_width: 1.0,
        }
    }

    pub fn with_outline(mut self, color: Color, width: f32) -> Self {
        self.outline = Some(color);
        self.outline_width = width;
        self
    }

    pub fn is_extruded(&self) -> bool {
        self.height.is_some() && self.extruded_height.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub position: Ecef,
    pub text: String,
    pub style: LabelStyle,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Point,
    Cylinder,
    Polygon,
    Label,
}

/// Everything the airspace tools ask the scene to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Point(PointMarker),
    Cylinder(CylinderShape),
    Polygon(PolygonShape),
    Label(TextLabel),
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Point(_) => PrimitiveKind::Point,
            Primitive::Cylinder(_) => PrimitiveKind::Cylinder,
            Primitive::Polygon(_) => PrimitiveKind::Polygon,
            Primitive::Label(_) => PrimitiveKind::Label,
        }
    }

    pub fn as_cylinder(&self) -> Option<&CylinderShape> {
        match self {
            Primitive::Cylinder(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&PolygonShape> {
        match self {
            Primitive::Polygon(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&TextLabel> {
        match self {
            Primitive::Label(l) => Some(l),
            _ => None,
        }
    }

    /// Fill color for shapes, text color for labels.
    pub fn color(&self) -> Color {
        match self {
            Primitive::Point(p) => p.color,
            Primitive::Cylinder(c) => c.fill,
            Primitive::Polygon(p) => p.fill,
            Primitive::Label(l) => l.style.fill,
        }
    }
}
