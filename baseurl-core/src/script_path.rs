/// Finds the directory the application is mounted under.
///
/// The web server's script name and the request path often disagree (path
/// info, rewritten URLs, different casing). The mount directory is the
/// longest case-insensitive common prefix of the two, cut back to the last
/// `/` at or before the point where they diverge. The result is always a
/// prefix of `request_path`.
///
/// ```
/// use baseurl_core::resolve_script_path;
///
/// assert_eq!(resolve_script_path("/blog/post/5", "/blog/index.php"), "/blog/");
/// assert_eq!(resolve_script_path("/app/index.php", "/other.php"), "/");
/// ```
pub fn resolve_script_path(request_path: &str, script_name: &str) -> String {
    let path = request_path.to_ascii_lowercase();
    let script = script_name.to_ascii_lowercase();

    if path == script {
        return request_path.to_string();
    }

    let common = path
        .bytes()
        .zip(script.bytes())
        .take_while(|(a, b)| a == b)
        .count();

    if common == 0 {
        return "/".to_string();
    }

    // Position `common` itself may hold the slash that ends the shared segment.
    let window = &request_path.as_bytes()[..(common + 1).min(request_path.len())];
    match window.iter().rposition(|&b| b == b'/') {
        Some(slash) => request_path[..=slash].to_string(),
        None => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_script_path;
    use pretty_assertions::assert_eq;

    #[test]
    fn identical_paths_return_request_path() {
        for p in ["", "/", "/index.php", "/a/b/c", "/Mixed/Case"] {
            assert_eq!(resolve_script_path(p, p), p);
        }
    }

    #[test]
    fn identical_ignoring_case_keeps_request_casing() {
        assert_eq!(
            resolve_script_path("/App/Index.php", "/app/index.php"),
            "/App/Index.php"
        );
    }

    #[test]
    fn no_common_prefix_mounts_at_root() {
        assert_eq!(resolve_script_path("/app/index.php", "/other.php"), "/");
        assert_eq!(resolve_script_path("app", "other"), "/");
        assert_eq!(resolve_script_path("/a/b", ""), "/");
        assert_eq!(resolve_script_path("", "/index.php"), "/");
    }

    #[test]
    fn truncates_to_last_shared_segment() {
        assert_eq!(resolve_script_path("/blog/post/5", "/blog/index.php"), "/blog/");
        assert_eq!(resolve_script_path("/a/b", "/a/index.php"), "/a/");
        assert_eq!(
            resolve_script_path("/shop/cart/add", "/shop/cart.php"),
            "/shop/cart/"
        );
    }

    #[test]
    fn divergence_on_a_slash_keeps_that_slash() {
        // "/blog" is shared, and the request continues with "/" where the script name ends.
        assert_eq!(resolve_script_path("/blog/post", "/blog"), "/blog/");
    }

    #[test]
    fn request_path_shorter_than_script() {
        assert_eq!(resolve_script_path("/a", "/a/index.php"), "/");
        assert_eq!(resolve_script_path("/a/", "/a/index.php"), "/a/");
    }

    #[test]
    fn comparison_is_case_insensitive_but_result_keeps_case() {
        assert_eq!(
            resolve_script_path("/Blog/Post/5", "/blog/index.php"),
            "/Blog/"
        );
    }

    #[test]
    fn result_is_always_a_directory_prefix() {
        let cases = [
            ("/x/y/z", "/x/q"),
            ("/x/y/z", "/x/y/index.php"),
            ("/%C3%BC/page", "/%c3%bc/index.php"),
            ("/a//b", "/a/index.php"),
        ];

        for (path, script) in cases {
            let resolved = resolve_script_path(path, script);

            assert!(path.starts_with(&resolved), "{resolved} is not a prefix of {path}");
            assert!(resolved.ends_with('/'), "{resolved} does not end in '/'");
        }
    }
}
