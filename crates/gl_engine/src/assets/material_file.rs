//! Line-oriented material description parser
//!
//! Scans a material file for the reflectance directives `Ka`, `Kd`, `Ks`,
//! `Ns` and the diffuse map directive `map_Kd`, matched by line prefix.
//! Parsing is best-effort: unrecognized or malformed lines are ignored and
//! never abort the scan, and a repeated directive overwrites the previous
//! value.

use crate::foundation::math::Vec3;

/// Values recognized in a material description file
///
/// Directives absent from the file stay `None` so the caller can keep its
/// prior state for them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialFileData {
    /// Ambient reflectance (Ka)
    pub ambient: Option<Vec3>,
    /// Diffuse reflectance (Kd)
    pub diffuse: Option<Vec3>,
    /// Specular reflectance (Ks)
    pub specular: Option<Vec3>,
    /// Specular exponent (Ns)
    pub specular_power: Option<f32>,
    /// Diffuse texture map filenames (map_Kd), in file order
    pub diffuse_maps: Vec<String>,
}

/// Parse material file contents line by line
pub fn parse_material_file(contents: &str) -> MaterialFileData {
    let mut data = MaterialFileData::default();

    for line in contents.lines() {
        let mut tokens = line.split_whitespace();
        let Some(directive) = tokens.next() else {
            continue;
        };

        match directive {
            "Ka" => {
                if let Some(value) = parse_vec3(&mut tokens) {
                    data.ambient = Some(value);
                }
            }
            "Kd" => {
                if let Some(value) = parse_vec3(&mut tokens) {
                    data.diffuse = Some(value);
                }
            }
            "Ks" => {
                if let Some(value) = parse_vec3(&mut tokens) {
                    data.specular = Some(value);
                }
            }
            "Ns" => {
                if let Some(value) = parse_f32(&mut tokens) {
                    data.specular_power = Some(value);
                }
            }
            "map_Kd" => {
                // Texture filenames may contain spaces; take the rest of the line
                let path: Vec<&str> = tokens.collect();
                if !path.is_empty() {
                    data.diffuse_maps.push(path.join(" "));
                }
            }
            // Everything else is ignored
            _ => {}
        }
    }

    data
}

fn parse_vec3<'a, I>(tokens: &mut I) -> Option<Vec3>
where
    I: Iterator<Item = &'a str>,
{
    let r = parse_f32(tokens)?;
    let g = parse_f32(tokens)?;
    let b = parse_f32(tokens)?;
    Some(Vec3::new(r, g, b))
}

fn parse_f32<'a, I>(tokens: &mut I) -> Option<f32>
where
    I: Iterator<Item = &'a str>,
{
    tokens.next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reflectance() {
        let data = parse_material_file(
            "Ka 0.1 0.2 0.3\nKd 0.8 0.8 0.8\nKs 1.0 1.0 1.0\nNs 32.0\n",
        );

        assert_eq!(data.ambient, Some(Vec3::new(0.1, 0.2, 0.3)));
        assert_eq!(data.diffuse, Some(Vec3::new(0.8, 0.8, 0.8)));
        assert_eq!(data.specular, Some(Vec3::new(1.0, 1.0, 1.0)));
        assert_eq!(data.specular_power, Some(32.0));
        assert!(data.diffuse_maps.is_empty());
    }

    #[test]
    fn test_parse_texture_maps_in_order() {
        let data = parse_material_file("map_Kd texture014.jpg\nmap_Kd default-grey.jpg\n");
        assert_eq!(data.diffuse_maps, vec!["texture014.jpg", "default-grey.jpg"]);
    }

    #[test]
    fn test_unrecognized_lines_ignored() {
        let data = parse_material_file(
            "# comment\nnewmtl mat_0-texture014.jpg\nillum 2\nKd 0.5 0.5 0.5\nd 1.0\n",
        );
        assert_eq!(data.diffuse, Some(Vec3::new(0.5, 0.5, 0.5)));
        assert_eq!(data.ambient, None);
    }

    #[test]
    fn test_malformed_line_does_not_abort() {
        let data = parse_material_file("Ka 0.1 bad\nKd 0.5 0.5 0.5\n");
        // The malformed Ka line is dropped, the rest of the file still parses
        assert_eq!(data.ambient, None);
        assert_eq!(data.diffuse, Some(Vec3::new(0.5, 0.5, 0.5)));
    }

    #[test]
    fn test_repeated_directive_last_write_wins() {
        let data = parse_material_file("Ns 8.0\nNs 32.0\n");
        assert_eq!(data.specular_power, Some(32.0));
    }

    #[test]
    fn test_absent_directives_stay_none() {
        let data = parse_material_file("");
        assert_eq!(data, MaterialFileData::default());
    }
}
