//! Convention-based route recognition.
//!
//! Routes map an HTTP method plus a URL pattern to a `controller#action`
//! pair. `resource()` generates the RESTful set for a named resource:
//!
//! - `GET    /posts`          → posts#index
//! - `GET    /posts/new`      → posts#new
//! - `POST   /posts`          → posts#create
//! - `GET    /posts/:id`      → posts#show
//! - `GET    /posts/:id/edit` → posts#edit
//! - `PUT    /posts/:id`      → posts#update
//! - `DELETE /posts/:id`      → posts#destroy
//!
//! Pattern segments starting with `:` capture the matched path segment as
//! a route parameter.

use indexmap::IndexMap;

/// A single route table entry.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: String,
    pub pattern: String,
    pub controller: String,
    pub action: String,
}

/// A recognized request: the controller/action pair plus captured params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    pub controller: String,
    pub action: String,
    pub params: IndexMap<String, String>,
}

/// Ordered route table. First match wins, so more specific patterns must
/// be declared before parameterized ones; `resource()` already orders its
/// generated routes accordingly.
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    routes: Vec<Route>,
}

impl RouteSet {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Declare an explicit route.
    pub fn route(mut self, method: &str, pattern: &str, controller: &str, action: &str) -> Self {
        self.routes.push(Route {
            method: method.to_uppercase(),
            pattern: pattern.to_string(),
            controller: controller.to_string(),
            action: action.to_string(),
        });
        self
    }

    /// Declare the RESTful route set for `name`.
    pub fn resource(self, name: &str) -> Self {
        let base = format!("/{}", name);
        let member = format!("{}/:id", base);
        self.route("GET", &base, name, "index")
            .route("GET", &format!("{}/new", base), name, "new")
            .route("POST", &base, name, "create")
            .route("GET", &member, name, "show")
            .route("GET", &format!("{}/edit", member), name, "edit")
            .route("PUT", &member, name, "update")
            .route("DELETE", &member, name, "destroy")
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve `method` + `path` to a controller/action pair, capturing
    /// `:param` segments. Returns `None` when no route matches.
    pub fn recognize(&self, method: &str, path: &str) -> Option<Recognition> {
        let method = method.to_uppercase();
        let segments = split_path(path);

        for route in &self.routes {
            if route.method != method {
                continue;
            }
            if let Some(params) = match_pattern(&route.pattern, &segments) {
                return Some(Recognition {
                    controller: route.controller.clone(),
                    action: route.action.clone(),
                    params,
                });
            }
        }
        None
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<IndexMap<String, String>> {
    let pattern_segments = split_path(pattern);
    if pattern_segments.len() != segments.len() {
        return None;
    }

    let mut params = IndexMap::new();
    for (pat, seg) in pattern_segments.iter().zip(segments) {
        if let Some(name) = pat.strip_prefix(':') {
            params.insert(name.to_string(), seg.to_string());
        } else if pat != seg {
            return None;
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recognized(routes: &RouteSet, method: &str, path: &str) -> (String, String) {
        let hit = routes.recognize(method, path).expect("route should match");
        (hit.controller, hit.action)
    }

    #[test]
    fn test_resource_generates_restful_routes() {
        let routes = RouteSet::new().resource("posts");

        assert_eq!(
            recognized(&routes, "GET", "/posts"),
            ("posts".to_string(), "index".to_string())
        );
        assert_eq!(
            recognized(&routes, "POST", "/posts"),
            ("posts".to_string(), "create".to_string())
        );
        assert_eq!(
            recognized(&routes, "GET", "/posts/7"),
            ("posts".to_string(), "show".to_string())
        );
        assert_eq!(
            recognized(&routes, "PUT", "/posts/7"),
            ("posts".to_string(), "update".to_string())
        );
        assert_eq!(
            recognized(&routes, "DELETE", "/posts/7"),
            ("posts".to_string(), "destroy".to_string())
        );
        assert_eq!(
            recognized(&routes, "GET", "/posts/7/edit"),
            ("posts".to_string(), "edit".to_string())
        );
    }

    #[test]
    fn test_new_takes_precedence_over_show() {
        let routes = RouteSet::new().resource("posts");
        assert_eq!(
            recognized(&routes, "GET", "/posts/new"),
            ("posts".to_string(), "new".to_string())
        );
    }

    #[test]
    fn test_recognize_captures_route_params() {
        let routes = RouteSet::new().resource("posts");
        let hit = routes.recognize("GET", "/posts/42").unwrap();
        assert_eq!(hit.params.get("id"), Some(&"42".to_string()));
    }

    #[test]
    fn test_explicit_routes() {
        let routes = RouteSet::new().route("GET", "/login", "sessions", "new");
        assert_eq!(
            recognized(&routes, "GET", "/login"),
            ("sessions".to_string(), "new".to_string())
        );
        assert_eq!(routes.recognize("POST", "/login"), None);
    }

    #[test]
    fn test_unmatched_paths_return_none() {
        let routes = RouteSet::new().resource("posts");
        assert_eq!(routes.recognize("GET", "/comments"), None);
        assert_eq!(routes.recognize("PATCH", "/posts/7"), None);
        assert_eq!(routes.recognize("GET", "/posts/7/edit/extra"), None);
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let routes = RouteSet::new().resource("posts");
        assert_eq!(
            recognized(&routes, "GET", "/posts/"),
            ("posts".to_string(), "index".to_string())
        );
    }
}
