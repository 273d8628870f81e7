// ABOUTME: Integration tests for validated domain types.
// ABOUTME: Image reference parsing and qualification, container name rules.

use simongpt_deploy::types::*;

mod image_ref_tests {
    use super::*;

    #[test]
    fn parse_simple_name() {
        let img = ImageRef::parse("simongpt-llm-router").unwrap();
        assert_eq!(img.name(), "simongpt-llm-router");
        assert!(img.tag().is_none());
        assert!(img.registry().is_none());
    }

    #[test]
    fn parse_with_registry_port_and_tag() {
        let img = ImageRef::parse("registry.simongpt.internal:5000/simongpt-llm-router:v2").unwrap();
        assert_eq!(img.registry(), Some("registry.simongpt.internal:5000"));
        assert_eq!(img.name(), "simongpt-llm-router");
        assert_eq!(img.tag(), Some("v2"));
    }

    #[test]
    fn parse_localhost_registry() {
        let img = ImageRef::parse("localhost/router").unwrap();
        assert_eq!(img.registry(), Some("localhost"));
        assert_eq!(img.name(), "router");
    }

    #[test]
    fn qualified_reference_has_no_implicit_tag() {
        let img = ImageRef::qualified("registry.simongpt.internal:5000", "simongpt-llm-router")
            .unwrap();
        assert_eq!(
            img.to_string(),
            "registry.simongpt.internal:5000/simongpt-llm-router"
        );
    }

    #[test]
    fn qualified_keeps_plain_registry_host() {
        let img = ImageRef::qualified("registry", "router:v1").unwrap();
        assert_eq!(img.registry(), Some("registry"));
        assert_eq!(img.name(), "router");
        assert_eq!(img.tag(), Some("v1"));
        assert_eq!(img.to_string(), "registry/router:v1");
    }

    #[test]
    fn qualified_trims_trailing_slash() {
        let img = ImageRef::qualified("registry.test:5000/", "router").unwrap();
        assert_eq!(img.to_string(), "registry.test:5000/router");
    }

    #[test]
    fn rejects_invalid_references() {
        assert_eq!(ImageRef::parse(""), Err(ParseImageRefError::Empty));
        assert_eq!(
            ImageRef::parse("router;rm -rf /"),
            Err(ParseImageRefError::InvalidChar(';'))
        );
        assert!(matches!(
            ImageRef::parse("Router"),
            Err(ParseImageRefError::NotLowercase(_))
        ));
        assert!(matches!(
            ImageRef::parse("router:"),
            Err(ParseImageRefError::InvalidFormat(_))
        ));
    }
}

mod container_name_tests {
    use super::*;

    #[test]
    fn display_and_filter() {
        let name = ContainerName::new("simongpt-llm-router").unwrap();
        assert_eq!(name.to_string(), "simongpt-llm-router");
        assert_eq!(name.name_filter(), "name=^/?simongpt-llm-router$");
    }

    #[test]
    fn rejects_empty_and_spaces() {
        assert_eq!(ContainerName::new(""), Err(ContainerNameError::Empty));
        assert_eq!(
            ContainerName::new("llm router"),
            Err(ContainerNameError::InvalidChar(' '))
        );
    }
}
