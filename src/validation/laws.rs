// Copyright 2025 Cowboy AI, LLC.

//! Best-effort law checks
//!
//! Composites are never computed, so every check compares sources and
//! targets only. When a mapping or component the check needs is absent the
//! result is [`Outcome::MissingData`], never a guess.

use crate::entity::{EntityId, GraphEntity};
use crate::errors::CategoryError;
use crate::identifiers::NodeId;
use crate::model::{FunctorId, Morphism, MorphismId, NaturalTransformationId, ObjectId};
use crate::store::Snapshot;

use super::{Law, LawCheck, Outcome};

fn name_of(snapshot: &Snapshot<'_>, id: impl Into<NodeId>) -> String {
    let id = id.into();
    snapshot
        .node(id)
        .map(|node| node.name().to_string())
        .unwrap_or_else(|| format!("#{id}"))
}

fn lookup_failed<E: GraphEntity>(law: Law, id: EntityId<E>) -> Vec<LawCheck> {
    vec![LawCheck::new(
        law,
        id,
        Outcome::MissingData,
        format!("Validation failed: {}", CategoryError::not_found(E::KIND, id)),
    )]
}

/// Check that a functor preserves endpoints, identities and composability
///
/// For every mapped morphism f the image F(f) must run F(dom f) → F(cod f);
/// an identity must map to the identity on F(X). For every composable pair
/// of mapped morphisms the images must be composable too. Objects whose
/// identity has no image are reported as missing data.
pub fn validate_functor_laws(snapshot: &Snapshot<'_>, functor_id: FunctorId) -> Vec<LawCheck> {
    let Some(functor) = snapshot.get(functor_id) else {
        return lookup_failed(Law::Endpoints, functor_id);
    };
    let name = &functor.name;
    let objects = snapshot.object_map(functor_id);
    let morphisms = snapshot.morphism_map(functor_id);
    let mut checks = Vec::new();

    let mut mapped: Vec<(&Morphism, &Morphism)> = Vec::new();
    for (source, image) in &morphisms {
        match (snapshot.get(*source), snapshot.get(*image)) {
            (Some(m), Some(fm)) => mapped.push((m, fm)),
            _ => checks.push(LawCheck::new(
                Law::Endpoints,
                *source,
                Outcome::MissingData,
                format!(
                    "{name}({}): mapping refers to a missing morphism",
                    name_of(snapshot, *source)
                ),
            )),
        }
    }

    for &(m, fm) in &mapped {
        let images = (objects.get(&m.source_id), objects.get(&m.target_id));
        let check = match images {
            (Some(fa), Some(fb)) if fm.source_id == *fa && fm.target_id == *fb => LawCheck::new(
                Law::Endpoints,
                m.id,
                Outcome::WellTyped,
                format!(
                    "{name}({}): well-typed, '{}' runs {} → {}",
                    m.name,
                    fm.name,
                    name_of(snapshot, *fa),
                    name_of(snapshot, *fb)
                ),
            ),
            (Some(fa), Some(fb)) => LawCheck::new(
                Law::Endpoints,
                m.id,
                Outcome::NotWellTyped,
                format!(
                    "{name}({}): not well-typed, '{}' runs {} → {} but {name}({}) → {name}({}) is {} → {}",
                    m.name,
                    fm.name,
                    name_of(snapshot, fm.source_id),
                    name_of(snapshot, fm.target_id),
                    name_of(snapshot, m.source_id),
                    name_of(snapshot, m.target_id),
                    name_of(snapshot, *fa),
                    name_of(snapshot, *fb)
                ),
            ),
            _ => LawCheck::new(
                Law::Endpoints,
                m.id,
                Outcome::MissingData,
                format!(
                    "{name}({}): insufficient data, {name} does not map both '{}' and '{}'",
                    m.name,
                    name_of(snapshot, m.source_id),
                    name_of(snapshot, m.target_id)
                ),
            ),
        };
        checks.push(check);

        if m.is_identity {
            let outcome = match objects.get(&m.source_id) {
                _ if !fm.is_identity => Outcome::NotWellTyped,
                Some(fx) if fm.source_id == *fx => Outcome::WellTyped,
                Some(_) => Outcome::NotWellTyped,
                None => Outcome::MissingData,
            };
            let message = match outcome {
                Outcome::WellTyped => format!("{name}({}): identity preserved, well-typed", m.name),
                Outcome::NotWellTyped => format!(
                    "{name}({}): not well-typed, '{}' is not the identity on {name}({})",
                    m.name,
                    fm.name,
                    name_of(snapshot, m.source_id)
                ),
                Outcome::MissingData => format!(
                    "{name}({}): insufficient data, {name} does not map '{}'",
                    m.name,
                    name_of(snapshot, m.source_id)
                ),
            };
            checks.push(LawCheck::new(Law::Identity, m.id, outcome, message));
        }
    }

    for (object, _) in &objects {
        let has_image = snapshot
            .identities_of(*object)
            .iter()
            .any(|identity| morphisms.contains_key(&identity.id));
        if !has_image {
            checks.push(LawCheck::new(
                Law::Identity,
                *object,
                Outcome::MissingData,
                format!(
                    "Identity on '{}': insufficient data, {name} does not map its identity",
                    name_of(snapshot, *object)
                ),
            ));
        }
    }

    for &(f, ff) in mapped.iter().filter(|(m, _)| !m.is_identity) {
        for &(g, fg) in mapped.iter().filter(|(m, _)| !m.is_identity) {
            if f.target_id != g.source_id {
                continue;
            }
            let (outcome, verdict) = if ff.target_id == fg.source_id {
                (Outcome::WellTyped, "well-typed".to_string())
            } else {
                (
                    Outcome::NotWellTyped,
                    format!(
                        "not well-typed, '{}' ends at {} but '{}' starts at {}",
                        ff.name,
                        name_of(snapshot, ff.target_id),
                        fg.name,
                        name_of(snapshot, fg.source_id)
                    ),
                )
            };
            checks.push(LawCheck::new(
                Law::Composition,
                f.id,
                outcome,
                format!(
                    "Composition {}∘{}: {name}({})∘{name}({}) {verdict}",
                    g.name, f.name, g.name, f.name
                ),
            ));
        }
    }

    checks
}

/// Check the naturality square of every non-identity morphism f : X → Y
///
/// The square is well-typed when G(f)∘α_X and α_Y∘F(f) are both defined
/// and run between the same objects.
pub fn validate_naturality(snapshot: &Snapshot<'_>, nt_id: NaturalTransformationId) -> Vec<LawCheck> {
    let Some(nt) = snapshot.get(nt_id) else {
        return lookup_failed(Law::Naturality, nt_id);
    };
    let (Some(f), Some(g)) = (snapshot.get(nt.source_functor_id), snapshot.get(nt.target_functor_id)) else {
        return vec![LawCheck::new(
            Law::Naturality,
            nt_id,
            Outcome::MissingData,
            format!("Natural transformation '{}' refers to a missing functor", nt.name),
        )];
    };

    let f_map = snapshot.morphism_map(f.id);
    let g_map = snapshot.morphism_map(g.id);
    let components = snapshot.components(nt_id);
    let resolve = |id: Option<&MorphismId>| id.and_then(|id| snapshot.get(*id));
    let component_at = |object: ObjectId| resolve(components.get(&object));

    let mut checks = Vec::new();
    for h in snapshot
        .morphisms_in(f.source_category_id)
        .into_iter()
        .filter(|m| !m.is_identity)
    {
        let square = format!("Square for {}", h.name);
        let (Some(fh), Some(gh)) = (resolve(f_map.get(&h.id)), resolve(g_map.get(&h.id))) else {
            checks.push(LawCheck::new(
                Law::Naturality,
                h.id,
                Outcome::MissingData,
                format!(
                    "{square}: missing F(f) or G(f) ({} maps it: {}, {} maps it: {})",
                    f.name,
                    yes_no(f_map.contains_key(&h.id)),
                    g.name,
                    yes_no(g_map.contains_key(&h.id))
                ),
            ));
            continue;
        };
        let (Some(ax), Some(ay)) = (component_at(h.source_id), component_at(h.target_id)) else {
            checks.push(LawCheck::new(
                Law::Naturality,
                h.id,
                Outcome::MissingData,
                format!(
                    "{square}: missing component α_{} or α_{}",
                    name_of(snapshot, h.source_id),
                    name_of(snapshot, h.target_id)
                ),
            ));
            continue;
        };

        let mut problems = Vec::new();
        if ax.target_id != gh.source_id {
            problems.push(format!(
                "'{}' ends at {} but '{}' starts at {}",
                ax.name,
                name_of(snapshot, ax.target_id),
                gh.name,
                name_of(snapshot, gh.source_id)
            ));
        }
        if fh.target_id != ay.source_id {
            problems.push(format!(
                "'{}' ends at {} but '{}' starts at {}",
                fh.name,
                name_of(snapshot, fh.target_id),
                ay.name,
                name_of(snapshot, ay.source_id)
            ));
        }
        if ax.source_id != fh.source_id {
            problems.push(format!(
                "paths start at {} and {}",
                name_of(snapshot, ax.source_id),
                name_of(snapshot, fh.source_id)
            ));
        }
        if gh.target_id != ay.target_id {
            problems.push(format!(
                "paths end at {} and {}",
                name_of(snapshot, gh.target_id),
                name_of(snapshot, ay.target_id)
            ));
        }

        let check = if problems.is_empty() {
            LawCheck::new(
                Law::Naturality,
                h.id,
                Outcome::WellTyped,
                format!(
                    "{square}: well-typed, {}∘{} and {}∘{} both run {} → {}",
                    gh.name,
                    ax.name,
                    ay.name,
                    fh.name,
                    name_of(snapshot, ax.source_id),
                    name_of(snapshot, ay.target_id)
                ),
            )
        } else {
            LawCheck::new(
                Law::Naturality,
                h.id,
                Outcome::NotWellTyped,
                format!("{square}: not well-typed ({})", problems.join("; ")),
            )
        };
        checks.push(check);
    }
    checks
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
