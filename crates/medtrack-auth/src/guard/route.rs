//! Route declarations and path matching.

use medtrack_entity::user::Role;

/// Access requirement attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No session required.
    Public,
    /// Any authenticated user. This is where the "empty role set means
    /// unrestricted" convention is centralized; the predicate engine is
    /// never consulted for it.
    Authenticated,
    /// Authenticated user holding any of these roles.
    Roles(&'static [Role]),
}

/// A declared route.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    /// Path pattern; `:name` segments match any single segment.
    pub pattern: &'static str,
    /// Who may navigate here.
    pub access: Access,
}

impl Route {
    /// Whether the given concrete path matches this route's pattern.
    pub fn matches(&self, path: &str) -> bool {
        let mut pattern = self.pattern.trim_matches('/').split('/');
        let mut path = path.trim_matches('/').split('/');
        loop {
            match (pattern.next(), path.next()) {
                (None, None) => return true,
                (Some(p), Some(s)) => {
                    if !p.starts_with(':') && p != s {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

/// Ordered route table; resolution is first-match, so literal segments
/// must be declared before parameter segments that would shadow them.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a table from explicit routes.
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The application's navigation surface.
    pub fn standard() -> Self {
        const PROVIDER_ROLES: &[Role] = &[Role::Doctor, Role::Admin];
        const ADMIN_ONLY: &[Role] = &[Role::Admin];

        Self::new(vec![
            // Public routes
            Route { pattern: "/", access: Access::Public },
            Route { pattern: "/login", access: Access::Public },
            Route { pattern: "/register", access: Access::Public },
            Route { pattern: "/unauthorized", access: Access::Public },
            // Any authenticated user
            Route { pattern: "/profile", access: Access::Authenticated },
            Route { pattern: "/medications", access: Access::Authenticated },
            // Doctors and admins
            Route { pattern: "/medications/new", access: Access::Roles(PROVIDER_ROLES) },
            Route { pattern: "/medications/:id/edit", access: Access::Roles(PROVIDER_ROLES) },
            // Declared after /medications/new so the literal wins
            Route { pattern: "/medications/:id", access: Access::Authenticated },
            // Admins only
            Route { pattern: "/users", access: Access::Roles(ADMIN_ONLY) },
        ])
    }

    /// Resolve a concrete path to its route, if declared.
    ///
    /// Undeclared paths are the not-found view, which is public.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_matching() {
        let table = RouteTable::standard();
        assert_eq!(table.resolve("/login").unwrap().access, Access::Public);
        assert_eq!(
            table.resolve("/medications").unwrap().access,
            Access::Authenticated
        );
    }

    #[test]
    fn test_parameter_matching() {
        let table = RouteTable::standard();
        let detail = table.resolve("/medications/65a1").unwrap();
        assert_eq!(detail.access, Access::Authenticated);
        assert_eq!(detail.pattern, "/medications/:id");

        let edit = table.resolve("/medications/65a1/edit").unwrap();
        assert!(matches!(edit.access, Access::Roles(_)));
    }

    #[test]
    fn test_new_is_not_shadowed_by_id() {
        let table = RouteTable::standard();
        let new = table.resolve("/medications/new").unwrap();
        assert_eq!(new.pattern, "/medications/new");
        assert!(matches!(new.access, Access::Roles(_)));
    }

    #[test]
    fn test_undeclared_path_is_unresolved() {
        let table = RouteTable::standard();
        assert!(table.resolve("/nope/nothing/here").is_none());
    }
}
