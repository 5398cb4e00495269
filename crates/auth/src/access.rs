//! The authorization decision procedure.
//!
//! Routes declare the access they require as parallel `(role, country)`
//! lists; tokens carry the access a user actually holds as an [`AccessMap`].
//! The functions here compare the two. Pure policy checks: no IO, no panics.

use std::collections::BTreeMap;

/// Access held per country: `{country: [role, ...]}`, inherited roles
/// included. `BTreeMap` keeps serialized claims deterministic.
pub type AccessMap = BTreeMap<String, Vec<String>>;

/// Does the token's access satisfy ANY of the required `(role, country)`
/// pairs?
///
/// `required_roles[i]` pairs with `required_countries[i]`. If the countries
/// list is shorter, its last element is repeated to pad to equal length (an
/// empty list pads with the wildcard). The empty string is a wildcard for
/// both role ("any role") and country ("any country"). Evaluation
/// short-circuits on the first matching pair.
///
/// Examples: requiring `["manager", "shared"]` with countries
/// `["jordan", "demo"]` admits managers in jordan and shared accounts in
/// demo; with countries `["jordan"]` it admits either role in jordan only;
/// with no countries it admits either role anywhere.
pub fn check_access(required_roles: &[&str], required_countries: &[&str], acc: &AccessMap) -> bool {
    required_pairs(required_roles, required_countries).any(|(role, country)| {
        pair_matches(role, country, acc)
    })
}

/// Does the token's access satisfy EVERY required `(role, country)` pair?
///
/// Same pairing, padding and wildcard rules as [`check_access`], but all
/// pairs must hold. This is the ownership check ("does the acting user cover
/// each of the target's assignments"), kept as a separate entry point so the
/// two logics cannot be confused via a mode flag. Vacuously true for an
/// empty requirement list.
pub fn check_access_all(
    required_roles: &[&str],
    required_countries: &[&str],
    acc: &AccessMap,
) -> bool {
    required_pairs(required_roles, required_countries).all(|(role, country)| {
        pair_matches(role, country, acc)
    })
}

/// Pair each required role with its country, repeating the last country to
/// pad the shorter list.
fn required_pairs<'a>(
    roles: &'a [&'a str],
    countries: &'a [&'a str],
) -> impl Iterator<Item = (&'a str, &'a str)> {
    let last = countries.last().copied().unwrap_or("");
    roles
        .iter()
        .enumerate()
        .map(move |(i, role)| (*role, countries.get(i).copied().unwrap_or(last)))
}

fn pair_matches(role: &str, country: &str, acc: &AccessMap) -> bool {
    if country.is_empty() {
        // Wildcard country: search every country in the token.
        acc.values().any(|held| role_matches(role, held))
    } else {
        match acc.get(country) {
            Some(held) => role_matches(role, held),
            None => false,
        }
    }
}

fn role_matches(role: &str, held: &[String]) -> bool {
    role.is_empty() || held.iter().any(|h| h == role)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acc(entries: &[(&str, &[&str])]) -> AccessMap {
        entries
            .iter()
            .map(|(country, roles)| {
                (
                    country.to_string(),
                    roles.iter().map(|r| r.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn global_wildcard_grants_on_any_access() {
        let map = acc(&[("jordan", &["clinic"])]);
        assert!(check_access(&[""], &[""], &map));
    }

    #[test]
    fn global_wildcard_denies_on_empty_access() {
        assert!(!check_access(&[""], &[""], &AccessMap::new()));
    }

    #[test]
    fn role_missing_from_countrys_closure_denies() {
        let map = acc(&[("jordan", &["clinic"])]);
        assert!(!check_access(&["admin"], &["jordan"], &map));
    }

    #[test]
    fn or_semantics_first_pair_matches() {
        let map = acc(&[("jordan", &["directorate"])]);
        assert!(check_access(
            &["directorate", "admin"],
            &["jordan", "jordan"],
            &map
        ));
    }

    #[test]
    fn or_semantics_later_pair_matches() {
        let map = acc(&[("jordan", &["admin"])]);
        assert!(check_access(
            &["directorate", "admin"],
            &["jordan", "jordan"],
            &map
        ));
    }

    #[test]
    fn countries_list_pads_with_last_element() {
        let map = acc(&[("x", &["c"])]);
        // Behaves as if countries were ["x", "x", "x"].
        assert!(check_access(&["a", "b", "c"], &["x"], &map));
        assert!(!check_access(&["a", "b"], &["x"], &map));
    }

    #[test]
    fn empty_countries_list_means_wildcard() {
        let map = acc(&[("demo", &["manager"])]);
        assert!(check_access(&["manager"], &[], &map));
    }

    #[test]
    fn wildcard_country_scans_every_country() {
        let map = acc(&[("demo", &["clinic"]), ("jordan", &["manager"])]);
        assert!(check_access(&["manager"], &[""], &map));
        assert!(!check_access(&["central"], &[""], &map));
    }

    #[test]
    fn concrete_country_with_wildcard_role() {
        let map = acc(&[("jordan", &["clinic"])]);
        assert!(check_access(&[""], &["jordan"], &map));
        assert!(!check_access(&[""], &["demo"], &map));
    }

    #[test]
    fn and_mode_requires_every_pair() {
        let map = acc(&[("jordan", &["manager", "clinic"]), ("demo", &["manager"])]);
        assert!(check_access_all(
            &["manager", "clinic"],
            &["jordan", "jordan"],
            &map
        ));
        assert!(!check_access_all(
            &["manager", "central"],
            &["jordan", "jordan"],
            &map
        ));
        assert!(!check_access_all(&["manager"], &["tunisia"], &map));
    }

    #[test]
    fn and_mode_is_vacuously_true_when_nothing_required() {
        assert!(check_access_all(&[], &[], &AccessMap::new()));
    }
}
