use crate::solid::Solid;
use crate::triangulated::Triangulated3D;
use std::io::Cursor;

/// Export to ASCII STL
///
/// ```rust
/// # use watch_movement::gear::{GearSpec, generate_gear_outline};
/// # use watch_movement::solid::Extruder;
/// # use watch_movement::traits::GeometrySink;
/// # use watch_movement::io::stl::to_stl_ascii;
/// let outline = generate_gear_outline(&GearSpec::new(1.0, 12)).unwrap();
/// let solid = Extruder.extrude_outline(&outline, 1.5);
/// let text = to_stl_ascii(&solid, "pinion");
/// assert!(text.starts_with("solid pinion"));
/// ```
pub fn to_stl_ascii<T: Triangulated3D>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    shape.visit_triangles(|tri| {
        let n = tri[0].normal;
        out.push_str(&format!(
            "  facet normal {:.6} {:.6} {:.6}\n",
            n.x, n.y, n.z
        ));
        out.push_str("    outer loop\n");
        for v in &tri {
            let p = v.position;
            out.push_str(&format!(
                "      vertex {:.6} {:.6} {:.6}\n",
                p.x, p.y, p.z
            ));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// The binary format has no room for a name; the header is left blank.
pub fn to_stl_binary<T: Triangulated3D>(shape: &T) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::new();

    shape.visit_triangles(|tri| {
        let n = tri[0].normal;
        #[allow(clippy::unnecessary_cast)]
        {
            triangles.push(Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|v| {
                    let p = v.position;
                    Vertex::new([p.x as f32, p.y as f32, p.z as f32])
                }),
            });
        }
    });

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

impl Solid {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }
}
