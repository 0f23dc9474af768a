//! Real-estate and geospatial analysis on a local planar site map.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    check_point, check_positive, count_in, distinct_points, int_in, sample_point,
    sample_star_polygon, SpatialScenario, TaskRng,
};
use crate::difficulty::GenerationParameters;
use crate::error::{Result, SpatialError};
use crate::geometry::{format_number, Point, Polygon, Rect};
use crate::task::{AnswerType, Difficulty, GroundTruth};

const AMENITY_KINDS: [&str; 7] = [
    "school",
    "hospital",
    "park",
    "grocery store",
    "train station",
    "library",
    "pharmacy",
];

/// Named point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub kind: String,
    pub location: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeospatialScenario {
    ZoneContainment {
        zone: Polygon,
        property: Point,
    },
    NearestAmenity {
        property: Point,
        amenities: Vec<Amenity>,
    },
    ZoningCompliance {
        property: Point,
        zone: Polygon,
        school: Point,
        max_school_distance: f64,
        highway: Rect,
        highway_buffer: f64,
    },
}

/// Property is inside the zone (boundary included), within
/// `max_school_distance` of the school, and strictly farther than
/// `highway_buffer` from the highway corridor.
#[must_use]
pub fn is_compliant(
    property: Point,
    zone: &Polygon,
    school: Point,
    max_school_distance: f64,
    highway: &Rect,
    highway_buffer: f64,
) -> bool {
    zone.contains(property)
        && property.distance_squared(school) <= max_school_distance * max_school_distance
        && highway.distance_squared_to(property) > highway_buffer * highway_buffer
}

fn sample_rect_zone(rng: &mut TaskRng, range: i64) -> Polygon {
    let x = int_in(rng, 0, range / 2);
    let y = int_in(rng, 0, range / 2);
    let w = int_in(rng, 3, (range - x as i64).max(3));
    let h = int_in(rng, 3, (range - y as i64).max(3));
    Rect::new(x, y, x + w, y + h).to_polygon()
}

fn check_polygon(zone: &Polygon) -> std::result::Result<(), String> {
    if zone.len() < 3 {
        return Err(format!("zone has {} vertices", zone.len()));
    }
    zone.vertices()
        .iter()
        .try_for_each(|v| check_point(*v, "zone vertex"))
}

impl SpatialScenario for GeospatialScenario {
    fn sample(tier: Difficulty, params: &GenerationParameters, rng: &mut TaskRng) -> Result<Self> {
        let range = params.coordinate_range as i64;
        match tier {
            Difficulty::Easy => Ok(Self::ZoneContainment {
                zone: sample_rect_zone(rng, range),
                property: sample_point(rng, 0, range),
            }),
            Difficulty::Medium => {
                let n = count_in(rng, 3, params.point_count);
                let pts = distinct_points(rng, n + 1, 0, range)?;
                let mut kinds: Vec<&str> = AMENITY_KINDS.to_vec();
                let amenities = pts[1..]
                    .iter()
                    .map(|&location| Amenity {
                        kind: kinds.remove(rng.gen_range(0..kinds.len())).to_string(),
                        location,
                    })
                    .collect();
                Ok(Self::NearestAmenity {
                    property: pts[0],
                    amenities,
                })
            }
            Difficulty::Hard => {
                let n = count_in(rng, 5, params.vertex_count);
                let center = Point::new((range / 2) as f64, (range / 2) as f64);
                let zone = sample_star_polygon(rng, center, 4, (range / 2).max(5) as u32, n);
                zone.validate()?;
                let property = if rng.gen_bool(0.7) {
                    let r = (range / 4).max(1);
                    Point::new(
                        center.x + int_in(rng, -r, r),
                        center.y + int_in(rng, -r, r),
                    )
                } else {
                    sample_point(rng, 0, range)
                };
                let lane = int_in(rng, 0, range - 1);
                Ok(Self::ZoningCompliance {
                    property,
                    zone,
                    school: sample_point(rng, 0, range),
                    max_school_distance: int_in(rng, 5, 10),
                    highway: Rect::new(0.0, lane, range as f64, lane + 1.0),
                    highway_buffer: int_in(rng, 2, 4),
                })
            }
        }
    }

    fn solve(&self) -> Result<GroundTruth> {
        match self {
            Self::ZoneContainment { zone, property } => {
                zone.validate()?;
                Ok(GroundTruth::Boolean(zone.contains(*property)))
            }
            Self::NearestAmenity {
                property,
                amenities,
            } => {
                let mut best: Option<(&Amenity, f64)> = None;
                let mut tied = false;
                for a in amenities {
                    let d = property.distance_squared(a.location);
                    match best {
                        Some((_, bd)) if d == bd => tied = true,
                        Some((_, bd)) if d > bd => {}
                        _ => {
                            best = Some((a, d));
                            tied = false;
                        }
                    }
                }
                match best {
                    Some((a, _)) if !tied => Ok(GroundTruth::Exact(a.kind.clone())),
                    Some(_) => Err(SpatialError::unsolvable("nearest amenity is tied")),
                    None => Err(SpatialError::unsolvable("no amenities")),
                }
            }
            Self::ZoningCompliance {
                property,
                zone,
                school,
                max_school_distance,
                highway,
                highway_buffer,
            } => {
                zone.validate()?;
                Ok(GroundTruth::Boolean(is_compliant(
                    *property,
                    zone,
                    *school,
                    *max_school_distance,
                    highway,
                    *highway_buffer,
                )))
            }
        }
    }

    fn answer_type(&self) -> AnswerType {
        match self {
            Self::NearestAmenity { .. } => AnswerType::Exact,
            Self::ZoneContainment { .. } | Self::ZoningCompliance { .. } => AnswerType::Boolean,
        }
    }

    fn prompt(&self) -> String {
        match self {
            Self::ZoneContainment { zone, property } => format!(
                "A residential zoning district is the polygon with vertices {zone} (site \
                 coordinates in hundreds of metres). Is the property at {property} inside the \
                 district? A property on the boundary counts as inside. Answer true or false."
            ),
            Self::NearestAmenity {
                property,
                amenities,
            } => {
                let listed: Vec<String> = amenities
                    .iter()
                    .map(|a| format!("{} at {}", a.kind, a.location))
                    .collect();
                format!(
                    "A property is located at {property}. Nearby amenities: {}. Which amenity is \
                     closest to the property by straight-line distance? Answer with the amenity \
                     type.",
                    listed.join(", ")
                )
            }
            Self::ZoningCompliance {
                property,
                zone,
                school,
                max_school_distance,
                highway,
                highway_buffer,
            } => format!(
                "A developer proposes a building at {property}. It is compliant only if all of \
                 the following hold: it lies inside the residential zone with vertices {zone} \
                 (boundary included); it is within {} units of the school at {school}; and it is \
                 more than {} units from the highway corridor occupying the rectangle from \
                 {highway}. Is the proposal compliant? Answer true or false.",
                format_number(*max_school_distance),
                format_number(*highway_buffer)
            ),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::ZoneContainment { .. } => "zone_containment",
            Self::NearestAmenity { .. } => "nearest_amenity",
            Self::ZoningCompliance { .. } => "zoning_compliance",
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), String> {
        match self {
            Self::ZoneContainment { zone, property } => {
                check_polygon(zone)?;
                check_point(*property, "property")
            }
            Self::NearestAmenity {
                property,
                amenities,
            } => {
                check_point(*property, "property")?;
                if amenities.len() < 2 {
                    return Err("nearest_amenity needs at least two amenities".to_string());
                }
                for (i, a) in amenities.iter().enumerate() {
                    check_point(a.location, &a.kind)?;
                    if amenities[..i].iter().any(|o| o.kind == a.kind) {
                        return Err(format!("duplicate amenity kind {}", a.kind));
                    }
                }
                Ok(())
            }
            Self::ZoningCompliance {
                property,
                zone,
                school,
                max_school_distance,
                highway,
                highway_buffer,
            } => {
                check_polygon(zone)?;
                check_point(*property, "property")?;
                check_point(*school, "school")?;
                check_positive(*max_school_distance, "max_school_distance")?;
                check_positive(*highway_buffer, "highway_buffer")?;
                check_point(Point::new(highway.x_min, highway.y_min), "highway")?;
                check_point(Point::new(highway.x_max, highway.y_max), "highway")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn square_zone() -> Polygon {
        Rect::new(0.0, 0.0, 10.0, 10.0).to_polygon()
    }

    #[test]
    fn test_zone_containment_boundary() {
        let edge = GeospatialScenario::ZoneContainment {
            zone: square_zone(),
            property: Point::new(10.0, 4.0),
        };
        let outside = GeospatialScenario::ZoneContainment {
            zone: square_zone(),
            property: Point::new(11.0, 4.0),
        };
        assert_eq!(edge.solve().unwrap(), GroundTruth::Boolean(true));
        assert_eq!(outside.solve().unwrap(), GroundTruth::Boolean(false));
    }

    #[test]
    fn test_nearest_amenity() {
        let s = GeospatialScenario::NearestAmenity {
            property: Point::new(5.0, 5.0),
            amenities: vec![
                Amenity {
                    kind: "park".to_string(),
                    location: Point::new(0.0, 0.0),
                },
                Amenity {
                    kind: "library".to_string(),
                    location: Point::new(6.0, 7.0),
                },
            ],
        };
        assert_eq!(s.solve().unwrap(), GroundTruth::Exact("library".to_string()));
    }

    #[test]
    fn test_zoning_compliance_each_constraint() {
        let zone = square_zone();
        let highway = Rect::new(0.0, 0.0, 20.0, 1.0);
        let school = Point::new(5.0, 9.0);
        assert!(is_compliant(Point::new(5.0, 6.0), &zone, school, 5.0, &highway, 3.0));
        // too close to the highway (distance exactly the buffer)
        assert!(!is_compliant(Point::new(5.0, 4.0), &zone, school, 5.0, &highway, 3.0));
        // outside the zone
        assert!(!is_compliant(Point::new(12.0, 8.0), &zone, school, 8.0, &highway, 3.0));
        // too far from the school
        assert!(!is_compliant(Point::new(1.0, 5.0), &zone, school, 5.0, &highway, 3.0));
    }

    #[test]
    fn test_sampled_scenarios_respect_bounds() {
        let params = GenerationParameters {
            coordinate_range: 20,
            vertex_count: 6,
            point_count: 5,
            constraint_count: 3,
            ..GenerationParameters::default()
        };
        let mut rng = TaskRng::seed_from_u64(19);
        for tier in Difficulty::all() {
            for _ in 0..20 {
                if let Ok(s) = GeospatialScenario::sample(*tier, &params, &mut rng) {
                    assert!(s.check_bounds().is_ok(), "{s:?}");
                }
            }
        }
    }
}
