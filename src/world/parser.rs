//! Line-level parsing for `.lvl` files.
//!
//! A level file is a sequence of section headers, each followed by data
//! lines. A data line is a name field plus zero or more `|`-separated
//! property groups of whitespace-separated numbers:
//!
//! ```text
//! Obj
//! door|1.0 2.0 3.0|0 0 0|1 1 1
//! Chara
//! octopus|0 1 4
//! ```

use bevy::math::Vec3;

use super::scene::{Character, LightRecord, StaticObject};

/// How subsequent data lines are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SectionMode {
    #[default]
    Object,
    RailObject,
    Light,
    Sky,
    Character,
    Collision,
}

impl SectionMode {
    pub const ALL: [SectionMode; 6] = [
        SectionMode::Object,
        SectionMode::RailObject,
        SectionMode::Light,
        SectionMode::Sky,
        SectionMode::Character,
        SectionMode::Collision,
    ];

    /// Keyword that switches into this mode.
    pub fn header(&self) -> &'static str {
        match self {
            SectionMode::Object => "Obj",
            SectionMode::RailObject => "RailObj",
            SectionMode::Light => "Light",
            SectionMode::Sky => "Sky",
            SectionMode::Character => "Chara",
            SectionMode::Collision => "Col",
        }
    }

    /// Mode named by a header line, if the line is one.
    pub fn from_header(line: &str) -> Option<Self> {
        let line = line.trim();
        Self::ALL.into_iter().find(|mode| mode.header() == line)
    }
}

/// A data line split into its name field and property groups.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitLine<'a> {
    pub name: &'a str,
    pub groups: Vec<Vec<&'a str>>,
}

impl<'a> SplitLine<'a> {
    /// All property tokens, in order, ignoring group boundaries.
    pub fn tokens(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.groups.iter().flat_map(|group| group.iter().copied())
    }

    /// Parse every token as a float.
    pub fn floats(&self) -> Result<Vec<f32>, String> {
        self.tokens().map(parse_float).collect()
    }

    /// Parse exactly `expected` floats, erroring on any other count.
    pub fn exact_floats(&self, expected: usize) -> Result<Vec<f32>, String> {
        let values = self.floats()?;
        if values.len() != expected {
            return Err(format!(
                "expected {} numeric fields after '{}', found {}",
                expected,
                self.name,
                values.len()
            ));
        }
        Ok(values)
    }
}

/// Two-level split: `|` into fields, then whitespace into tokens.
///
/// The number of groups is whatever the line contains.
pub fn split_fields(line: &str) -> SplitLine<'_> {
    let mut fields = line.split('|');
    let name = fields.next().unwrap_or("").trim();
    let groups = fields
        .map(|field| field.split_whitespace().collect())
        .collect();
    SplitLine { name, groups }
}

pub fn parse_float(token: &str) -> Result<f32, String> {
    token
        .parse::<f32>()
        .map_err(|_| format!("invalid number '{}'", token))
}

fn vec3(values: &[f32]) -> Vec3 {
    Vec3::new(values[0], values[1], values[2])
}

/// `name|x y z|rx ry rz|sx sy sz`
pub fn parse_object(line: &str) -> Result<StaticObject, String> {
    let split = split_fields(line);
    if split.name.is_empty() {
        return Err("object line has no name".to_string());
    }
    let values = split.exact_floats(9)?;

    Ok(StaticObject {
        name: split.name.to_string(),
        position: vec3(&values[0..3]),
        rotation: vec3(&values[3..6]),
        scale: vec3(&values[6..9]),
    })
}

/// `id|x y z`
pub fn parse_character(line: &str) -> Result<Character, String> {
    let split = split_fields(line);
    if split.name.is_empty() {
        return Err("character line has no id".to_string());
    }
    let values = split.exact_floats(3)?;

    Ok(Character::with_idle(split.name, vec3(&values)))
}

/// `name|x y z|r g b`. Validated only; lights are not part of the scene yet.
pub fn parse_light(line: &str) -> Result<LightRecord, String> {
    let split = split_fields(line);
    if split.groups.len() != 2 {
        return Err(format!(
            "light '{}' needs a position and a color group, found {} groups",
            split.name,
            split.groups.len()
        ));
    }
    let values = split.exact_floats(6)?;

    Ok(LightRecord {
        name: split.name.to_string(),
        position: vec3(&values[0..3]),
        color: vec3(&values[3..6]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::scene::AnimType;

    #[test]
    fn test_headers() {
        assert_eq!(SectionMode::from_header("Obj"), Some(SectionMode::Object));
        assert_eq!(SectionMode::from_header("RailObj"), Some(SectionMode::RailObject));
        assert_eq!(SectionMode::from_header("Chara"), Some(SectionMode::Character));
        assert_eq!(SectionMode::from_header("Col"), Some(SectionMode::Collision));
        assert_eq!(SectionMode::from_header("Sky"), Some(SectionMode::Sky));
        assert_eq!(SectionMode::from_header("Light"), Some(SectionMode::Light));
        assert_eq!(SectionMode::from_header("obj"), None);
        assert_eq!(SectionMode::from_header("door|1 2 3"), None);
        for mode in SectionMode::ALL {
            assert_eq!(SectionMode::from_header(mode.header()), Some(mode));
        }
    }

    #[test]
    fn test_split_variable_groups() {
        let split = split_fields("crate|1 2|3|  4  5 6 ");
        assert_eq!(split.name, "crate");
        assert_eq!(split.groups, vec![vec!["1", "2"], vec!["3"], vec!["4", "5", "6"]]);

        let bare = split_fields("skyName");
        assert_eq!(bare.name, "skyName");
        assert!(bare.groups.is_empty());
    }

    #[test]
    fn test_parse_door_object() {
        let obj = parse_object("door|1.0 2.0 3.0|0 0 0|1 1 1").unwrap();
        assert_eq!(obj.name, "door");
        assert_eq!(obj.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(obj.rotation, Vec3::ZERO);
        assert_eq!(obj.scale, Vec3::ONE);
    }

    #[test]
    fn test_object_round_trips_through_line() {
        let obj = parse_object("rock_02|-1.25 0.5 1e3|90 45.5 -180|0.1 2 3.333").unwrap();
        let again = parse_object(&obj.to_line()).unwrap();
        assert_eq!(obj, again);
    }

    #[test]
    fn test_object_wrong_count() {
        let err = parse_object("door|1 2 3|0 0 0").unwrap_err();
        assert!(err.contains("expected 9"), "{err}");
    }

    #[test]
    fn test_object_bad_number() {
        let err = parse_object("door|1 two 3|0 0 0|1 1 1").unwrap_err();
        assert!(err.contains("'two'"), "{err}");
    }

    #[test]
    fn test_parse_character() {
        let chara = parse_character("octopus|0 1.5 -4").unwrap();
        assert_eq!(chara.id, "octopus");
        assert_eq!(chara.position, Vec3::new(0.0, 1.5, -4.0));
        assert_eq!(chara.animations.len(), 1);
        let idle = &chara.animations[&AnimType::Idle];
        assert_eq!((idle.start_frame, idle.frame_count), (0, 1));
    }

    #[test]
    fn test_parse_light_validates() {
        let light = parse_light("lamp|0 3 0|1 0.9 0.8").unwrap();
        assert_eq!(light.color, Vec3::new(1.0, 0.9, 0.8));
        assert!(parse_light("lamp|0 3 0").is_err());
        assert!(parse_light("lamp|0 3 0|1 x 1").is_err());
    }
}
