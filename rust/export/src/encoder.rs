// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC4 encoder
//!
//! Writes one self-contained IFC4 file per generation in a single forward
//! pass: context and units, the spatial tree, one product per member,
//! plate and bolt group, then the containment relation. Members with cuts
//! get a chain of `IfcBooleanResult` differences in place of their plain
//! extrusion.
//!
//! The model is Y-up; IFC is Z-up. Every point and direction is rotated
//! +90° about X on the way out: `(x, y, z) → (x, -z, y)`.

use crate::error::{Error, Result};
use crate::guid::global_id;
use crate::step::{EntityId, StepHeader, StepValue as V, StepWriter};
use nalgebra::{Point3, Vector3};
use portal_core::{BoltGroup, Cut, Feature, FeatureMeta, Generation, Member, Plate};
use portal_geometry::{polygon_for, Frame, MemberRole, Polygon2D, ProfileResolver};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// File header and spatial structure names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub file_name: String,
    pub project_name: String,
    pub site_name: String,
    pub building_name: String,
    pub storey_name: String,
    pub author: String,
    pub organization: String,
    /// Header timestamp. Fixed by default so repeated exports are identical.
    pub timestamp: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "portal-frame.ifc".to_string(),
            project_name: "Portal Frame".to_string(),
            site_name: "Site".to_string(),
            building_name: "Building".to_string(),
            storey_name: "Level 0".to_string(),
            author: String::new(),
            organization: String::new(),
            timestamp: "2024-01-01T00:00:00".to_string(),
        }
    }
}

impl ExportConfig {
    fn header(&self) -> StepHeader {
        StepHeader {
            description: "ViewDefinition [DesignTransferView]".to_string(),
            file_name: self.file_name.clone(),
            timestamp: self.timestamp.clone(),
            author: self.author.clone(),
            organization: self.organization.clone(),
            preprocessor: format!("portal-export {}", env!("CARGO_PKG_VERSION")),
            originating_system: "portal-frame".to_string(),
            schema: "IFC4".to_string(),
        }
    }
}

/// Encode a generation as an IFC4 STEP file.
///
/// The generation is re-validated first; a dangling cut target or a
/// non-positive feature dimension aborts the export and nothing is returned.
pub fn encode(
    generation: &Generation,
    resolver: &ProfileResolver,
    config: &ExportConfig,
) -> Result<String> {
    generation.validate()?;
    check_dimensions(generation)?;

    let mut cuts: FxHashMap<&str, Vec<&Cut>> = FxHashMap::default();
    for cut in generation.features().iter().filter_map(Feature::as_cut) {
        cuts.entry(cut.target.as_str()).or_default().push(cut);
    }

    let mut encoder = Encoder::begin(resolver, config);
    let mut products = Vec::with_capacity(generation.members().len() + generation.features().len());

    for member in generation.members() {
        let member_cuts = cuts.get(member.name.as_str()).map(Vec::as_slice).unwrap_or(&[]);
        products.push(encoder.member(member, member_cuts));
    }
    for feature in generation.features() {
        match feature {
            Feature::Plate(plate) => products.push(encoder.plate(plate)),
            Feature::BoltGroup(group) => products.push(encoder.bolt_group(group)),
            // Applied to their target member above
            Feature::Cut(_) => {}
        }
    }

    encoder.contain(&products, config);

    let entities = encoder.writer.len();
    let text = encoder.writer.finish(&config.header());
    tracing::info!(
        entities,
        products = products.len(),
        bytes = text.len(),
        "encoded IFC4 document"
    );
    Ok(text)
}

fn check_dimensions(generation: &Generation) -> Result<()> {
    let positive = |name: &str, field: &'static str, value: f64| {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidFeature {
                name: name.to_string(),
                field,
                value,
            })
        }
    };

    for member in generation.members() {
        if member.length() < 1e-9 {
            return Err(Error::DegenerateMember(member.name.clone()));
        }
    }
    for feature in generation.features() {
        match feature {
            Feature::Plate(p) => {
                positive(&p.name, "width", p.width)?;
                positive(&p.name, "height", p.height)?;
                positive(&p.name, "thickness", p.thickness)?;
            }
            Feature::BoltGroup(b) => {
                positive(&b.name, "bolt count", b.pattern.len() as f64)?;
                positive(&b.name, "bolt diameter", b.bolt_diameter)?;
                positive(&b.name, "bolt length", b.bolt_length)?;
            }
            Feature::Cut(c) => {
                positive(&c.name, "width", c.width)?;
                positive(&c.name, "height", c.height)?;
                positive(&c.name, "depth", c.depth)?;
            }
        }
    }
    Ok(())
}

#[inline]
fn to_ifc(v: &Vector3<f64>) -> [f64; 3] {
    [v.x, -v.z, v.y]
}

/// Property value for a property set
enum Prop {
    Label(String),
    Integer(i64),
    Measure(&'static str, f64),
}

struct Encoder<'a> {
    writer: StepWriter,
    resolver: &'a ProfileResolver,
    body: EntityId,
    world: EntityId,
    placement_2d: EntityId,
    extrude_dir: EntityId,
    storey: EntityId,
    storey_placement: EntityId,
}

impl<'a> Encoder<'a> {
    /// Context, units, project and spatial tree.
    fn begin(resolver: &'a ProfileResolver, config: &ExportConfig) -> Self {
        let mut w = StepWriter::new();

        let origin = w.add("IFCCARTESIANPOINT", &[V::reals(&[0.0, 0.0, 0.0])]);
        let world = w.add("IFCAXIS2PLACEMENT3D", &[V::Ref(origin), V::Null, V::Null]);
        let origin_2d = w.add("IFCCARTESIANPOINT", &[V::reals(&[0.0, 0.0])]);
        let placement_2d = w.add("IFCAXIS2PLACEMENT2D", &[V::Ref(origin_2d), V::Null]);
        let extrude_dir = w.add("IFCDIRECTION", &[V::reals(&[0.0, 0.0, 1.0])]);

        let context = w.add(
            "IFCGEOMETRICREPRESENTATIONCONTEXT",
            &[
                V::Null,
                V::string("Model"),
                V::Integer(3),
                V::Real(1e-5),
                V::Ref(world),
                V::Null,
            ],
        );
        let body = w.add(
            "IFCGEOMETRICREPRESENTATIONSUBCONTEXT",
            &[
                V::string("Body"),
                V::string("Model"),
                V::Derived,
                V::Derived,
                V::Derived,
                V::Derived,
                V::Ref(context),
                V::Null,
                V::Enum("MODEL_VIEW"),
                V::Null,
            ],
        );

        let units: Vec<EntityId> = [
            ("LENGTHUNIT", None, "METRE"),
            ("AREAUNIT", None, "SQUARE_METRE"),
            ("VOLUMEUNIT", None, "CUBIC_METRE"),
            ("MASSUNIT", Some("KILO"), "GRAM"),
            ("PLANEANGLEUNIT", None, "RADIAN"),
        ]
        .into_iter()
        .map(|(unit_type, prefix, name)| {
            w.add(
                "IFCSIUNIT",
                &[
                    V::Derived,
                    V::Enum(unit_type),
                    prefix.map(V::Enum).unwrap_or(V::Null),
                    V::Enum(name),
                ],
            )
        })
        .collect();
        let unit_assignment = w.add("IFCUNITASSIGNMENT", &[V::refs(&units)]);

        let project = w.add(
            "IFCPROJECT",
            &[
                V::string(global_id("project", &config.project_name)),
                V::Null,
                V::string(config.project_name.as_str()),
                V::Null,
                V::Null,
                V::Null,
                V::Null,
                V::refs(&[context]),
                V::Ref(unit_assignment),
            ],
        );

        let site_placement = w.add("IFCLOCALPLACEMENT", &[V::Null, V::Ref(world)]);
        let site = w.add(
            "IFCSITE",
            &[
                V::string(global_id("site", &config.site_name)),
                V::Null,
                V::string(config.site_name.as_str()),
                V::Null,
                V::Null,
                V::Ref(site_placement),
                V::Null,
                V::Null,
                V::Enum("ELEMENT"),
                V::Null,
                V::Null,
                V::Null,
                V::Null,
                V::Null,
            ],
        );

        let building_placement =
            w.add("IFCLOCALPLACEMENT", &[V::Ref(site_placement), V::Ref(world)]);
        let building = w.add(
            "IFCBUILDING",
            &[
                V::string(global_id("building", &config.building_name)),
                V::Null,
                V::string(config.building_name.as_str()),
                V::Null,
                V::Null,
                V::Ref(building_placement),
                V::Null,
                V::Null,
                V::Enum("ELEMENT"),
                V::Null,
                V::Null,
                V::Null,
            ],
        );

        let storey_placement =
            w.add("IFCLOCALPLACEMENT", &[V::Ref(building_placement), V::Ref(world)]);
        let storey = w.add(
            "IFCBUILDINGSTOREY",
            &[
                V::string(global_id("storey", &config.storey_name)),
                V::Null,
                V::string(config.storey_name.as_str()),
                V::Null,
                V::Null,
                V::Ref(storey_placement),
                V::Null,
                V::Null,
                V::Enum("ELEMENT"),
                V::Real(0.0),
            ],
        );

        for (name, parent, child) in [
            ("project-site", project, site),
            ("site-building", site, building),
            ("building-storey", building, storey),
        ] {
            w.add(
                "IFCRELAGGREGATES",
                &[
                    V::string(global_id("aggregates", name)),
                    V::Null,
                    V::Null,
                    V::Null,
                    V::Ref(parent),
                    V::refs(&[child]),
                ],
            );
        }

        Self {
            writer: w,
            resolver,
            body,
            world,
            placement_2d,
            extrude_dir,
            storey,
            storey_placement,
        }
    }

    fn point(&mut self, p: &Point3<f64>) -> EntityId {
        self.writer
            .add("IFCCARTESIANPOINT", &[V::reals(&to_ifc(&p.coords))])
    }

    fn direction(&mut self, v: &Vector3<f64>) -> EntityId {
        self.writer.add("IFCDIRECTION", &[V::reals(&to_ifc(v))])
    }

    /// Axis placement from a feature frame: Axis = frame Z, RefDirection = frame X.
    fn axis_placement(&mut self, origin: &Point3<f64>, frame: &Frame) -> EntityId {
        let location = self.point(origin);
        let axis = self.direction(&frame.z);
        let ref_direction = self.direction(&frame.x);
        self.writer.add(
            "IFCAXIS2PLACEMENT3D",
            &[V::Ref(location), V::Ref(axis), V::Ref(ref_direction)],
        )
    }

    /// Sweep `profile` from `origin` along the frame's Z by `depth`.
    fn extrusion(&mut self, profile: EntityId, origin: &Point3<f64>, frame: &Frame, depth: f64) -> EntityId {
        let position = self.axis_placement(origin, frame);
        self.writer.add(
            "IFCEXTRUDEDAREASOLID",
            &[
                V::Ref(profile),
                V::Ref(position),
                V::Ref(self.extrude_dir),
                V::Real(depth),
            ],
        )
    }

    fn rectangle_profile(&mut self, width: f64, height: f64) -> EntityId {
        self.writer.add(
            "IFCRECTANGLEPROFILEDEF",
            &[
                V::Enum("AREA"),
                V::Null,
                V::Ref(self.placement_2d),
                V::Real(width),
                V::Real(height),
            ],
        )
    }

    fn outline_profile(&mut self, name: &str, outline: &Polygon2D) -> EntityId {
        let mut points: Vec<EntityId> = outline
            .ring()
            .iter()
            .map(|p| self.writer.add("IFCCARTESIANPOINT", &[V::reals(&[p.x, p.y])]))
            .collect();
        // Closed by repeating the first point instance
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        let polyline = self.writer.add("IFCPOLYLINE", &[V::refs(&points)]);
        self.writer.add(
            "IFCARBITRARYCLOSEDPROFILEDEF",
            &[V::Enum("AREA"), V::string(name), V::Ref(polyline)],
        )
    }

    /// Body representation wrapped in a product definition shape.
    fn shape(&mut self, items: &[EntityId], representation_type: &str) -> EntityId {
        let representation = self.writer.add(
            "IFCSHAPEREPRESENTATION",
            &[
                V::Ref(self.body),
                V::string("Body"),
                V::string(representation_type),
                V::refs(items),
            ],
        );
        self.writer.add(
            "IFCPRODUCTDEFINITIONSHAPE",
            &[V::Null, V::Null, V::refs(&[representation])],
        )
    }

    /// Products carry model coordinates in their geometry, so their own
    /// placement is the identity under the storey.
    fn product_placement(&mut self) -> EntityId {
        self.writer.add(
            "IFCLOCALPLACEMENT",
            &[V::Ref(self.storey_placement), V::Ref(self.world)],
        )
    }

    fn property_set(&mut self, product: EntityId, owner: &str, set_name: &str, props: Vec<(&str, Prop)>) {
        let properties: Vec<EntityId> = props
            .into_iter()
            .map(|(name, prop)| {
                let value = match prop {
                    Prop::Label(s) => V::typed("IFCLABEL", V::String(s)),
                    Prop::Integer(i) => V::typed("IFCINTEGER", V::Integer(i)),
                    Prop::Measure(type_name, v) => V::typed(type_name, V::Real(v)),
                };
                self.writer.add(
                    "IFCPROPERTYSINGLEVALUE",
                    &[V::string(name), V::Null, value, V::Null],
                )
            })
            .collect();

        let scope = format!("{}/{}", set_name, owner);
        let set = self.writer.add(
            "IFCPROPERTYSET",
            &[
                V::string(global_id("pset", &scope)),
                V::Null,
                V::string(set_name),
                V::Null,
                V::refs(&properties),
            ],
        );
        self.writer.add(
            "IFCRELDEFINESBYPROPERTIES",
            &[
                V::string(global_id("defines", &scope)),
                V::Null,
                V::Null,
                V::Null,
                V::refs(&[product]),
                V::Ref(set),
            ],
        );
    }

    fn member(&mut self, member: &Member, cuts: &[&Cut]) -> EntityId {
        let resolver = self.resolver;
        let profile = resolver.resolve_with_role(&member.profile_key, Some(member.role));
        let outline = polygon_for(profile);
        let length = member.length();

        let swept_area = self.outline_profile(&profile.key, &outline);
        let mut item = self.extrusion(swept_area, &member.start, &member.frame(), length);
        for cut in cuts {
            let cut_box = self.cut_box(cut);
            item = self.writer.add(
                "IFCBOOLEANRESULT",
                &[V::Enum("DIFFERENCE"), V::Ref(item), V::Ref(cut_box)],
            );
        }
        let representation_type = if cuts.is_empty() { "SweptSolid" } else { "CSG" };
        let shape = self.shape(&[item], representation_type);
        let placement = self.product_placement();

        let (entity, predefined) = match member.role {
            MemberRole::Column => ("IFCCOLUMN", "COLUMN"),
            MemberRole::Rafter => ("IFCBEAM", "BEAM"),
            MemberRole::Purlin => ("IFCMEMBER", "PURLIN"),
        };
        let id = self.writer.add(
            entity,
            &[
                V::string(global_id("member", &member.name)),
                V::Null,
                V::string(member.name.as_str()),
                V::Null,
                V::string(profile.key.as_str()),
                V::Ref(placement),
                V::Ref(shape),
                V::string(member.name.as_str()),
                V::Enum(predefined),
            ],
        );

        let mut props = vec![("Designation", Prop::Label(profile.key.clone()))];
        if !profile.standard.is_empty() {
            props.push(("Standard", Prop::Label(profile.standard.clone())));
        }
        if !profile.country.is_empty() {
            props.push(("Country", Prop::Label(profile.country.clone())));
        }
        props.push(("MassPerLength", Prop::Measure("IFCMASSPERLENGTHMEASURE", profile.mass_kg_m)));
        props.push(("Length", Prop::Measure("IFCLENGTHMEASURE", length)));
        props.push(("Mass", Prop::Measure("IFCMASSMEASURE", length * profile.mass_kg_m)));
        self.property_set(id, &member.name, "Pset_PortalMember", props);
        id
    }

    /// Box solid of a cut, centred on the cut centre.
    fn cut_box(&mut self, cut: &Cut) -> EntityId {
        let profile = self.rectangle_profile(cut.width, cut.height);
        let start = cut.center() - cut.frame.z * (cut.depth / 2.0);
        self.extrusion(profile, &start, &cut.frame, cut.depth)
    }

    fn plate(&mut self, plate: &Plate) -> EntityId {
        let profile = self.rectangle_profile(plate.width, plate.height);
        let solid = self.extrusion(profile, &plate.origin, &plate.frame, plate.thickness);
        let shape = self.shape(&[solid], "SweptSolid");
        let placement = self.product_placement();

        let id = self.writer.add(
            "IFCPLATE",
            &[
                V::string(global_id("feature", &plate.name)),
                V::Null,
                V::string(plate.name.as_str()),
                V::Null,
                V::string(plate.meta.connection.as_str()),
                V::Ref(placement),
                V::Ref(shape),
                V::string(plate.name.as_str()),
                V::Enum("SHEET"),
            ],
        );

        let mut props = connection_props(&plate.meta);
        props.push(("Thickness", Prop::Measure("IFCPOSITIVELENGTHMEASURE", plate.thickness)));
        self.property_set(id, &plate.name, "Pset_PortalConnection", props);
        id
    }

    fn bolt_group(&mut self, group: &BoltGroup) -> EntityId {
        let profile = self.writer.add(
            "IFCCIRCLEPROFILEDEF",
            &[
                V::Enum("AREA"),
                V::Null,
                V::Ref(self.placement_2d),
                V::Real(group.bolt_diameter / 2.0),
            ],
        );
        let half = group.frame.z * (group.bolt_length / 2.0);
        let centres: Vec<Point3<f64>> = group.bolt_centres().collect();
        let solids: Vec<EntityId> = centres
            .iter()
            .map(|centre| self.extrusion(profile, &(centre - half), &group.frame, group.bolt_length))
            .collect();
        let shape = self.shape(&solids, "SweptSolid");
        let placement = self.product_placement();

        let id = self.writer.add(
            "IFCMECHANICALFASTENER",
            &[
                V::string(global_id("feature", &group.name)),
                V::Null,
                V::string(group.name.as_str()),
                V::Null,
                V::string(group.meta.connection.as_str()),
                V::Ref(placement),
                V::Ref(shape),
                V::string(group.name.as_str()),
                V::Real(group.bolt_diameter),
                V::Real(group.bolt_length),
                V::Enum("BOLT"),
            ],
        );

        let mut props = connection_props(&group.meta);
        props.push(("BoltCount", Prop::Integer(group.pattern.len() as i64)));
        self.property_set(id, &group.name, "Pset_PortalConnection", props);
        id
    }

    fn contain(&mut self, products: &[EntityId], config: &ExportConfig) {
        if products.is_empty() {
            return;
        }
        self.writer.add(
            "IFCRELCONTAINEDINSPATIALSTRUCTURE",
            &[
                V::string(global_id("contains", &config.storey_name)),
                V::Null,
                V::Null,
                V::Null,
                V::refs(products),
                V::Ref(self.storey),
            ],
        );
    }
}

fn connection_props(meta: &FeatureMeta) -> Vec<(&'static str, Prop)> {
    let mut props = vec![
        ("Connection", Prop::Label(meta.connection.as_str().to_string())),
        ("Frame", Prop::Integer(meta.frame as i64 + 1)),
    ];
    if let Some(side) = meta.side {
        props.push(("Side", Prop::Label(side.tag().to_string())));
    }
    props
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_rotation_is_proper() {
        // Y-up vertical becomes IFC +Z, building length becomes -Y
        assert_eq!(to_ifc(&Vector3::y()), [0.0, 0.0, 1.0]);
        assert_eq!(to_ifc(&Vector3::z()), [0.0, -1.0, 0.0]);
        assert_eq!(to_ifc(&Vector3::x()), [1.0, 0.0, 0.0]);

        // Right-handedness survives: rotated X × rotated Y = rotated Z
        let [ax, ay, az] = to_ifc(&Vector3::x());
        let [bx, by, bz] = to_ifc(&Vector3::y());
        let cross = Vector3::new(ax, ay, az).cross(&Vector3::new(bx, by, bz));
        let [cx, cy, cz] = to_ifc(&Vector3::z());
        assert_eq!(cross, Vector3::new(cx, cy, cz));
    }

    #[test]
    fn test_default_header_is_fixed() {
        let header = ExportConfig::default().header();
        assert_eq!(header.schema, "IFC4");
        assert_eq!(header.timestamp, "2024-01-01T00:00:00");
    }
}
