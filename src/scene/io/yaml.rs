use std::{
    collections::HashMap,
    f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, PI, TAU},
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use derive_builder::Builder;
use saphyr::Yaml;
use thiserror::Error;

use super::obj_model::{ObjModelParser, ObjParseError};
use crate::{
    math::{color::Color, point::Point, tuple::Tuple, vector::Vector},
    scene::{
        SceneBuilder,
        camera::{CameraBuilder, Orientation},
        light::Light,
        object::{
            material::Material,
            primitive::{
                mesh::{MeshError, TriangleMesh},
                plane::Plane,
                sphere::Sphere,
                triangle::{CullMode, Triangle},
            },
        },
    },
    shading::integrator::LightingMode,
};

#[derive(Builder)]
/// The output of the parser. It contains builders for scene and camera, because the cli options
/// can override the values in the yaml file.
pub struct YamlSceneConfig {
    #[builder(setter(strip_option), default = "None")]
    pub lighting_mode: Option<LightingMode>,
    #[builder(setter(strip_option), default = "None")]
    pub shadows_enabled: Option<bool>,
    #[builder(setter(strip_option), default = "None")]
    pub shadow_bias: Option<f64>,

    #[builder(field(ty = "CameraBuilder", build = "self.camera_builder.clone()"))]
    pub camera_builder: CameraBuilder,
    #[builder(field(ty = "SceneBuilder", build = "self.scene_builder.clone()"))]
    pub scene_builder: SceneBuilder,
}

#[derive(Debug, Error)]
pub enum YamlParseError {
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("invalid value for field `{0}`")]
    InvalidField(String),
    #[error("expected an operation like `add: sphere`, `define: NAME`, `camera` or `options`")]
    UnexpectedValue,
    #[error("unknown define `{0}`")]
    UnknownDefine(String),
    #[error("unknown variant `{0}`")]
    UnknownVariant(String),
    #[error("unknown material `{0}`")]
    UnknownMaterial(String),
    #[error("yaml syntax error: {0}")]
    YamlSyntaxError(String),
    #[error("scene files must contain a single yaml document")]
    MultipleDocuments,
    #[error("{0}")]
    FileReadError(String),
    #[error("obj model: {0}")]
    ObjParsingError(#[from] ObjParseError),
    #[error("mesh: {0}")]
    Mesh(#[from] MeshError),
    #[error("internal error: {0}")]
    InternalError(String),
}

type YamlParseResult<T> = Result<T, YamlParseError>;
type YamlParserOutput = YamlParseResult<YamlSceneConfig>;

const CAMERA_KEYS: &[&str] = &[
    "camera", "from", "to", "forward", "pitch", "yaw", "fov", "fov-degrees", "width", "height",
];
const OPTIONS_KEYS: &[&str] = &["options", "lighting-mode", "shadows", "shadow-bias"];
const MATERIAL_KEYS: &[&str] = &[
    "add",
    "name",
    "type",
    "color",
    "albedo",
    "diffuse",
    "specular",
    "exponent",
    "metalness",
    "roughness",
];
const LIGHT_KEYS: &[&str] = &["add", "type", "at", "direction", "color", "intensity"];
const SPHERE_KEYS: &[&str] = &["add", "center", "radius", "material"];
const PLANE_KEYS: &[&str] = &["add", "at", "normal", "material"];
const TRIANGLE_KEYS: &[&str] = &["add", "p1", "p2", "p3", "cull", "material"];
const MESH_KEYS: &[&str] = &[
    "add",
    "file",
    "positions",
    "indices",
    "cull",
    "material",
    "translate",
    "rotate-y",
    "scale",
];

fn predefined_defines() -> HashMap<String, Yaml> {
    let num = |v: f64| Yaml::Real(v.to_string());
    let color = |r: f64, g: f64, b: f64| Yaml::Array(vec![num(r), num(g), num(b)]);

    [
        ("PI", num(PI)),
        ("2_PI", num(TAU)),
        ("FRAC_PI_2", num(FRAC_PI_2)),
        ("FRAC_PI_3", num(FRAC_PI_3)),
        ("FRAC_PI_4", num(FRAC_PI_4)),
        ("FRAC_PI_6", num(FRAC_PI_6)),
        ("FRAC_1_SQRT_2", num(FRAC_1_SQRT_2)),
        ("WHITE", color(1., 1., 1.)),
        ("BLACK", color(0., 0., 0.)),
        ("RED", color(1., 0., 0.)),
        ("GREEN", color(0., 1., 0.)),
        ("BLUE", color(0., 0., 1.)),
        ("YELLOW", color(1., 1., 0.)),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect()
}

pub struct YamlParser<'a> {
    yaml: &'a Yaml,
    input_path: Option<&'a Path>,
    result: YamlSceneConfigBuilder,
    defines: HashMap<String, Yaml>,
    /// Named materials and their index in the scene
    materials: HashMap<String, usize>,
    material_count: usize,
    default_material: Option<usize>,
}

impl<'a> YamlParser<'a> {
    fn file_read_error(&self, og_path: &str, path: &Path, err: std::io::Error) -> YamlParseError {
        let warning = if path.is_absolute() {
            ""
        } else {
            ". The path is relative, so it was resolved relative to the input file."
        };
        let scene_path = self.input_path.unwrap_or(Path::new(".")).to_string_lossy();
        let path = path.to_string_lossy();

        YamlParseError::FileReadError(format!(
            "Failed to read file `{path}`. Resolved from `{og_path}` specified in the scene `{scene_path}` : `{err}`{warning}"
        ))
    }

    fn warn_unknown_keys(body: &Yaml, context: &str, known: &[&str]) {
        let Some(hash) = body.as_hash() else {
            return;
        };
        for key in hash.keys() {
            match key.as_str() {
                Some(key) if known.contains(&key) => {}
                Some(key) => log::warn!("ignoring unknown key `{key}` in {context}"),
                None => log::warn!("ignoring non-string key in {context}"),
            }
        }
    }
}

impl<'a> YamlParser<'a> {
    pub fn new(yaml: &'a Yaml, input_path: Option<&'a Path>) -> Self {
        Self {
            yaml,
            input_path,
            result: YamlSceneConfigBuilder::default(),
            defines: predefined_defines(),
            materials: HashMap::new(),
            material_count: 0,
            default_material: None,
        }
    }

    fn resolve_define(&self, name: &str) -> YamlParseResult<&Yaml> {
        self.defines
            .get(name)
            .ok_or_else(|| YamlParseError::UnknownDefine(name.to_string()))
    }

    fn parse_num(&self, value: &Yaml) -> YamlParseResult<f64> {
        match value {
            Yaml::Integer(value) => Ok(*value as f64),
            Yaml::Real(value) => value
                .parse()
                .map_err(|_| YamlParseError::InvalidField(value.clone())),
            Yaml::String(name) => {
                if let Some(name) = name.strip_prefix('-') {
                    return self.parse_num(&Yaml::String(name.to_string())).map(|v| -v);
                }
                self.parse_num(self.resolve_define(name)?)
            }
            _ => Err(YamlParseError::InvalidField(format!("{value:?}"))),
        }
    }

    fn parse_field_num(&self, body: &Yaml, key: &str) -> YamlParseResult<f64> {
        match &body[key] {
            Yaml::BadValue => Err(YamlParseError::MissingField(key.to_string())),
            val => self
                .parse_num(val)
                .map_err(|err| Self::with_field_context(err, key)),
        }
    }

    fn parse_optional_num(&self, body: &Yaml, key: &str, default: f64) -> YamlParseResult<f64> {
        match &body[key] {
            Yaml::BadValue => Ok(default),
            _ => self.parse_field_num(body, key),
        }
    }

    fn with_field_context(err: YamlParseError, key: &str) -> YamlParseError {
        match err {
            YamlParseError::InvalidField(_) => YamlParseError::InvalidField(key.to_string()),
            err => err,
        }
    }

    fn parse_vec3(&self, body: &Yaml, key: &str) -> YamlParseResult<(f64, f64, f64)> {
        let value = match &body[key] {
            Yaml::BadValue => return Err(YamlParseError::MissingField(key.to_string())),
            Yaml::String(name) => self.resolve_define(name)?,
            value => value,
        };
        self.parse_vec3_value(value)
            .map_err(|err| Self::with_field_context(err, key))
    }

    fn parse_vec3_value(&self, value: &Yaml) -> YamlParseResult<(f64, f64, f64)> {
        match value.as_vec().map(Vec::as_slice) {
            Some([x, y, z]) => Ok((self.parse_num(x)?, self.parse_num(y)?, self.parse_num(z)?)),
            _ => Err(YamlParseError::InvalidField(format!("{value:?}"))),
        }
    }

    fn parse_point(&self, body: &Yaml, key: &str) -> YamlParseResult<Point> {
        let (x, y, z) = self.parse_vec3(body, key)?;
        Ok(Point::new(x, y, z))
    }

    fn parse_vector(&self, body: &Yaml, key: &str) -> YamlParseResult<Vector> {
        let (x, y, z) = self.parse_vec3(body, key)?;
        Ok(Vector::new(x, y, z))
    }

    fn parse_color(&self, body: &Yaml, key: &str) -> YamlParseResult<Color> {
        let (r, g, b) = self.parse_vec3(body, key)?;
        Ok(Color::new(r, g, b))
    }

    fn parse_optional_color(&self, body: &Yaml, key: &str, default: Color) -> YamlParseResult<Color> {
        match &body[key] {
            Yaml::BadValue => Ok(default),
            _ => self.parse_color(body, key),
        }
    }

    fn parse_bool(&self, body: &Yaml, key: &str) -> YamlParseResult<bool> {
        body[key]
            .as_bool()
            .ok_or_else(|| YamlParseError::InvalidField(key.to_string()))
    }

    fn parse_camera(&mut self, body: &Yaml) -> YamlParseResult<()> {
        Self::warn_unknown_keys(body, "camera", CAMERA_KEYS);

        if !body["width"].is_badvalue() {
            let width = self.parse_field_num(body, "width")? as usize;
            self.result.camera_builder.target_width(width);
        }
        if !body["height"].is_badvalue() {
            let height = self.parse_field_num(body, "height")? as usize;
            self.result.camera_builder.target_height(height);
        }
        if !body["fov"].is_badvalue() {
            let fov = self.parse_field_num(body, "fov")?;
            self.result.camera_builder.field_of_view(fov);
        }
        if !body["fov-degrees"].is_badvalue() {
            let fov = self.parse_field_num(body, "fov-degrees")?.to_radians();
            self.result.camera_builder.field_of_view(fov);
        }

        let from = match &body["from"] {
            Yaml::BadValue => None,
            _ => Some(self.parse_point(body, "from")?),
        };
        if let Some(from) = from {
            self.result.camera_builder.origin(from);
        }

        let orientation = match (&body["forward"], &body["to"]) {
            (Yaml::BadValue, Yaml::BadValue) => {
                if body["pitch"].is_badvalue() && body["yaw"].is_badvalue() {
                    None
                } else {
                    Some(Orientation::new(
                        self.parse_optional_num(body, "pitch", 0.)?,
                        self.parse_optional_num(body, "yaw", 0.)?,
                    ))
                }
            }
            (_, Yaml::BadValue) => Some(Orientation::looking_along(
                self.parse_vector(body, "forward")?,
            )),
            (Yaml::BadValue, _) => {
                let to = self.parse_point(body, "to")?;
                let from = from.ok_or_else(|| YamlParseError::MissingField("from".to_string()))?;
                Some(Orientation::looking_along(to - from))
            }
            _ => return Err(YamlParseError::InvalidField("forward".to_string())),
        };
        if let Some(orientation) = orientation {
            self.result.camera_builder.orientation(orientation);
        }
        Ok(())
    }

    fn parse_options(&mut self, body: &Yaml) -> YamlParseResult<()> {
        Self::warn_unknown_keys(body, "options", OPTIONS_KEYS);

        match &body["lighting-mode"] {
            Yaml::BadValue => {}
            Yaml::String(name) => {
                let mode = LightingMode::from_str(name, true)
                    .map_err(|_| YamlParseError::UnknownVariant(name.clone()))?;
                self.result.lighting_mode(mode);
            }
            _ => return Err(YamlParseError::InvalidField("lighting-mode".to_string())),
        }
        if !body["shadows"].is_badvalue() {
            let shadows = self.parse_bool(body, "shadows")?;
            self.result.shadows_enabled(shadows);
        }
        if !body["shadow-bias"].is_badvalue() {
            let bias = self.parse_field_num(body, "shadow-bias")?;
            self.result.shadow_bias(bias);
        }
        Ok(())
    }

    fn parse_material(&self, body: &Yaml) -> YamlParseResult<Material> {
        if let Yaml::String(name) = body {
            return self.parse_material(self.resolve_define(name)?);
        }
        if body.as_hash().is_none() {
            return Err(YamlParseError::InvalidField("material".to_string()));
        }
        Self::warn_unknown_keys(body, "material", MATERIAL_KEYS);

        let color_key = if body["albedo"].is_badvalue() {
            "color"
        } else {
            "albedo"
        };
        let color = self.parse_optional_color(body, color_key, Color::white())?;
        let diffuse = self.parse_optional_num(body, "diffuse", 1.)?;

        let kind = body["type"].as_str().unwrap_or("lambert");
        Ok(match kind {
            "solid" | "solid-color" => Material::solid_color(color),
            "lambert" => Material::lambert(color, diffuse),
            "lambert-phong" | "phong" => Material::lambert_phong(
                color,
                diffuse,
                self.parse_optional_num(body, "specular", 0.5)?,
                self.parse_optional_num(body, "exponent", 60.)?,
            ),
            "cook-torrance" | "pbr" => Material::cook_torrance(
                color,
                self.parse_optional_num(body, "metalness", 0.)?,
                self.parse_optional_num(body, "roughness", 0.5)?,
            ),
            other => return Err(YamlParseError::UnknownVariant(other.to_string())),
        })
    }

    fn push_material(&mut self, material: Material) -> usize {
        self.result.scene_builder.material(material);
        self.material_count += 1;
        self.material_count - 1
    }

    fn add_named_material(&mut self, body: &Yaml) -> YamlParseResult<()> {
        let name = body["name"]
            .as_str()
            .ok_or_else(|| YamlParseError::MissingField("name".to_string()))?
            .to_string();
        let material = self.parse_material(body)?;
        let index = self.push_material(material);
        if self.materials.insert(name.clone(), index).is_some() {
            log::warn!("material `{name}` redefined, later objects use the new one");
        }
        Ok(())
    }

    /// Index of the object's material, adding inline or define-based materials on first use.
    fn resolve_material_index(&mut self, body: &Yaml) -> YamlParseResult<usize> {
        match &body["material"] {
            Yaml::BadValue => match self.default_material {
                Some(index) => Ok(index),
                None => {
                    let index = self.push_material(Material::default());
                    self.default_material = Some(index);
                    Ok(index)
                }
            },
            Yaml::String(name) => {
                if let Some(&index) = self.materials.get(name) {
                    return Ok(index);
                }
                if !self.defines.contains_key(name) {
                    return Err(YamlParseError::UnknownMaterial(name.clone()));
                }
                let material = self.parse_material(&body["material"])?;
                let index = self.push_material(material);
                self.materials.insert(name.clone(), index);
                Ok(index)
            }
            inline => {
                let material = self.parse_material(inline)?;
                Ok(self.push_material(material))
            }
        }
    }

    fn parse_cull_mode(&self, body: &Yaml) -> YamlParseResult<CullMode> {
        match &body["cull"] {
            Yaml::BadValue => Ok(CullMode::None),
            Yaml::String(name) => match name.as_str() {
                "none" => Ok(CullMode::None),
                "front" | "front-face" => Ok(CullMode::FrontFace),
                "back" | "back-face" => Ok(CullMode::BackFace),
                other => Err(YamlParseError::UnknownVariant(other.to_string())),
            },
            _ => Err(YamlParseError::InvalidField("cull".to_string())),
        }
    }

    fn parse_light(&self, body: &Yaml) -> YamlParseResult<Light> {
        Self::warn_unknown_keys(body, "light", LIGHT_KEYS);

        let color = self.parse_optional_color(body, "color", Color::white())?;
        let intensity = self.parse_optional_num(body, "intensity", 1.)?;

        match body["type"].as_str().unwrap_or("point") {
            "point" => Ok(Light::point(self.parse_point(body, "at")?, intensity, color)),
            "directional" => Ok(Light::directional(
                self.parse_vector(body, "direction")?,
                intensity,
                color,
            )),
            other => Err(YamlParseError::UnknownVariant(other.to_string())),
        }
    }

    fn resolve_path_from_scene(&self, path: &Path) -> PathBuf {
        let input_dir = match self.input_path {
            Some(input_path) => input_path.parent().unwrap_or_else(|| Path::new(".")),
            None => Path::new("."),
        };

        input_dir.join(path)
    }

    fn parse_indices(&self, body: &Yaml) -> YamlParseResult<Vec<usize>> {
        body["indices"]
            .as_vec()
            .ok_or_else(|| YamlParseError::MissingField("indices".to_string()))?
            .iter()
            .map(|index| match index {
                Yaml::Integer(index) if *index >= 0 => Ok(*index as usize),
                _ => Err(YamlParseError::InvalidField("indices".to_string())),
            })
            .collect()
    }

    fn parse_mesh(
        &self,
        body: &Yaml,
        cull_mode: CullMode,
        material_index: usize,
    ) -> YamlParseResult<TriangleMesh> {
        let mut mesh = match body["file"].as_str() {
            Some(file_path) => {
                let path = self.resolve_path_from_scene(Path::new(file_path));
                let source = std::fs::read_to_string(&path)
                    .map_err(|err| self.file_read_error(file_path, &path, err))?;
                ObjModelParser::parse_to_mesh(&source, cull_mode, material_index)?
            }
            None => {
                let positions = body["positions"]
                    .as_vec()
                    .ok_or_else(|| YamlParseError::MissingField("positions".to_string()))?
                    .iter()
                    .map(|value| {
                        self.parse_vec3_value(value)
                            .map(|(x, y, z)| Point::new(x, y, z))
                    })
                    .collect::<YamlParseResult<Vec<Point>>>()
                    .map_err(|err| Self::with_field_context(err, "positions"))?;
                TriangleMesh::new(positions, self.parse_indices(body)?, cull_mode, material_index)?
            }
        };

        if !body["translate"].is_badvalue() {
            mesh.translate(self.parse_vector(body, "translate")?);
        }
        if !body["rotate-y"].is_badvalue() {
            mesh.rotate_y(self.parse_field_num(body, "rotate-y")?);
        }
        match &body["scale"] {
            Yaml::BadValue => {}
            Yaml::Array(_) => mesh.scale(self.parse_vector(body, "scale")?),
            _ => {
                let factor = self.parse_field_num(body, "scale")?;
                mesh.scale(Vector::new(factor, factor, factor));
            }
        }
        mesh.update_transforms();
        Ok(mesh)
    }

    fn parse_add(&mut self, what: &str, body: &Yaml) -> YamlParseResult<()> {
        match what {
            "camera" => self.parse_camera(body)?,
            "light" => {
                let light = self.parse_light(body)?;
                self.result.scene_builder.light(light);
            }
            "material" => self.add_named_material(body)?,
            "sphere" => {
                Self::warn_unknown_keys(body, "sphere", SPHERE_KEYS);
                let center = self.parse_point(body, "center")?;
                let radius = self.parse_field_num(body, "radius")?;
                let material_index = self.resolve_material_index(body)?;
                self.result
                    .scene_builder
                    .shape(Sphere::new(center, radius, material_index));
            }
            "plane" => {
                Self::warn_unknown_keys(body, "plane", PLANE_KEYS);
                let origin = self.parse_point(body, "at")?;
                let normal = self.parse_vector(body, "normal")?;
                let material_index = self.resolve_material_index(body)?;
                self.result
                    .scene_builder
                    .shape(Plane::new(origin, normal, material_index));
            }
            "triangle" => {
                Self::warn_unknown_keys(body, "triangle", TRIANGLE_KEYS);
                let p1 = self.parse_point(body, "p1")?;
                let p2 = self.parse_point(body, "p2")?;
                let p3 = self.parse_point(body, "p3")?;
                let cull_mode = self.parse_cull_mode(body)?;
                let material_index = self.resolve_material_index(body)?;
                self.result
                    .scene_builder
                    .shape(Triangle::new(p1, p2, p3, cull_mode, material_index));
            }
            "mesh" | "obj" => {
                Self::warn_unknown_keys(body, "mesh", MESH_KEYS);
                let cull_mode = self.parse_cull_mode(body)?;
                let material_index = self.resolve_material_index(body)?;
                let mesh = self.parse_mesh(body, cull_mode, material_index)?;
                self.result.scene_builder.shape(mesh);
            }
            name => return Err(YamlParseError::UnknownVariant(name.to_string())),
        }
        Ok(())
    }

    fn parse_define(&mut self, name: &str, body: &Yaml) -> YamlParseResult<()> {
        let value = &body["value"];
        if value.is_badvalue() {
            return Err(YamlParseError::MissingField("value".to_string()));
        }

        let value = match body["extend"].as_str() {
            Some(base) => {
                let base = self.resolve_define(base)?;
                match (base.as_hash(), value.as_hash()) {
                    (Some(base), Some(overrides)) => {
                        let mut merged = base.clone();
                        for (key, value) in overrides {
                            merged.insert(key.clone(), value.clone());
                        }
                        Yaml::Hash(merged)
                    }
                    _ => return Err(YamlParseError::InvalidField("extend".to_string())),
                }
            }
            None => value.clone(),
        };
        self.defines.insert(name.to_string(), value);
        Ok(())
    }

    fn parse_operation(&mut self, yaml_obj: &Yaml) -> YamlParseResult<()> {
        let Yaml::Hash(hash) = yaml_obj else {
            return Err(YamlParseError::UnexpectedValue);
        };
        match hash.front() {
            Some((Yaml::String(operation), Yaml::String(what))) => match operation.as_str() {
                "add" => self.parse_add(what, yaml_obj),
                "define" => self.parse_define(what, yaml_obj),
                _ => Err(YamlParseError::UnexpectedValue),
            },
            Some((Yaml::String(operation), Yaml::Null)) => match operation.as_str() {
                "camera" => self.parse_camera(yaml_obj),
                "options" => self.parse_options(yaml_obj),
                _ => Err(YamlParseError::UnexpectedValue),
            },
            _ => Err(YamlParseError::UnexpectedValue),
        }
    }

    fn parse(&mut self) -> YamlParseResult<()> {
        match self.yaml {
            Yaml::Array(operations) => operations
                .iter()
                .try_for_each(|yaml_obj| self.parse_operation(yaml_obj)),
            Yaml::Null | Yaml::BadValue => Ok(()),
            _ => Err(YamlParseError::UnexpectedValue),
        }
    }

    fn parse_consume(mut self) -> YamlParserOutput {
        self.parse()?;

        self.result
            .build()
            .map_err(|err| YamlParseError::InternalError(err.to_string()))
    }
}

impl YamlParser<'_> {
    fn str_to_yaml(source: &str) -> YamlParseResult<Yaml> {
        let mut docs = saphyr::Yaml::load_from_str(source)
            .map_err(|err| YamlParseError::YamlSyntaxError(err.to_string()))?;
        match docs.len() {
            1 => Ok(std::mem::replace(&mut docs[0], Yaml::BadValue)),
            0 => Ok(Yaml::Array(vec![])),
            _ => Err(YamlParseError::MultipleDocuments),
        }
    }
}

pub fn parse_str(source: &str, input_path: Option<&Path>) -> YamlParserOutput {
    let yaml = YamlParser::str_to_yaml(source)?;
    YamlParser::new(&yaml, input_path).parse_consume()
}

pub fn parse_file(input_path: &Path) -> YamlParserOutput {
    let source = std::fs::read_to_string(input_path).map_err(|err| {
        YamlParseError::FileReadError(format!(
            "Failed to read scene `{}`: `{err}`",
            input_path.to_string_lossy()
        ))
    })?;
    parse_str(&source, Some(input_path))
}
