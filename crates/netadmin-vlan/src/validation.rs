//! Admission rules for VLAN records.
//!
//! Every record must satisfy all of the following before the store accepts
//! it, and again when it is loaded from disk:
//!
//! 1. The tag lies in `MIN_TAG..=MAX_TAG` (0 and 4095 are reserved by 802.1Q).
//! 2. The name is not empty.
//! 3. The gateway address lies inside the subnet.
//!
//! Tags need not be unique and `status` is free-form.

use std::fmt;
use std::net::IpAddr;

use ipnet::IpNet;

use crate::model::Vlan;

/// Lowest usable VLAN tag.
pub const MIN_TAG: u16 = 1;

/// Highest usable VLAN tag.
pub const MAX_TAG: u16 = 4094;

/// A single broken admission rule.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("invalid VLAN ID {0} (expected range 1..4094)")]
    TagOutOfRange(u16),

    #[error("name must not be empty")]
    EmptyName,

    #[error("gateway {gateway} must belong to subnet {subnet}")]
    GatewayOutsideSubnet { gateway: IpAddr, subnet: IpNet },
}

/// Check every admission rule and return all violations, in rule order.
///
/// An empty result means the record is valid.
pub fn validate(vlan: &Vlan) -> Vec<Violation> {
    let mut violations = Vec::new();
    if !(MIN_TAG..=MAX_TAG).contains(&vlan.tag) {
        violations.push(Violation::TagOutOfRange(vlan.tag));
    }
    if vlan.name.is_empty() {
        violations.push(Violation::EmptyName);
    }
    // IpNet::contains is false across address families.
    if !vlan.subnet.contains(&vlan.gateway) {
        violations.push(Violation::GatewayOutsideSubnet {
            gateway: vlan.gateway,
            subnet: vlan.subnet,
        });
    }
    violations
}

/// Like [`validate`], but as a `Result` carrying every violation.
pub fn ensure_valid(vlan: &Vlan) -> Result<(), ValidationError> {
    match ValidationError::new(validate(vlan)) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// One or more admission rule violations, always reported together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Wrap a violation list. Returns `None` when the list is empty.
    pub fn new(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VlanId;
    use proptest::prelude::*;

    fn vlan(tag: u16, name: &str, subnet: &str, gateway: &str) -> Vlan {
        Vlan {
            id: VlanId::new(),
            tag,
            name: name.into(),
            subnet: subnet.parse().unwrap(),
            gateway: gateway.parse().unwrap(),
            status: "enabled".into(),
        }
    }

    #[test]
    fn valid_record_has_no_violations() {
        let v = vlan(1, "eng", "10.0.0.0/24", "10.0.0.1");
        assert!(validate(&v).is_empty());
        assert!(ensure_valid(&v).is_ok());
    }

    #[test]
    fn tag_bounds() {
        assert!(validate(&vlan(MIN_TAG, "a", "10.0.0.0/8", "10.1.1.1")).is_empty());
        assert!(validate(&vlan(MAX_TAG, "a", "10.0.0.0/8", "10.1.1.1")).is_empty());
        assert_eq!(
            validate(&vlan(0, "a", "10.0.0.0/8", "10.1.1.1")),
            vec![Violation::TagOutOfRange(0)]
        );
        assert_eq!(
            validate(&vlan(4095, "a", "10.0.0.0/8", "10.1.1.1")),
            vec![Violation::TagOutOfRange(4095)]
        );
    }

    #[test]
    fn out_of_range_tag_message_mentions_range() {
        let violations = validate(&vlan(5000, "eng", "10.0.0.0/24", "10.0.0.1"));
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].to_string(),
            "invalid VLAN ID 5000 (expected range 1..4094)"
        );
    }

    #[test]
    fn empty_name_rejected() {
        let violations = validate(&vlan(10, "", "10.0.0.0/24", "10.0.0.1"));
        assert_eq!(violations, vec![Violation::EmptyName]);
    }

    #[test]
    fn gateway_outside_subnet_rejected() {
        let violations = validate(&vlan(1, "eng", "10.0.0.0/24", "10.0.1.1"));
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].to_string(),
            "gateway 10.0.1.1 must belong to subnet 10.0.0.0/24"
        );
    }

    #[test]
    fn gateway_of_other_family_rejected() {
        let violations = validate(&vlan(1, "eng", "10.0.0.0/24", "::ffff:10.0.0.1"));
        assert!(matches!(
            violations.as_slice(),
            [Violation::GatewayOutsideSubnet { .. }]
        ));
    }

    #[test]
    fn all_violations_reported_together() {
        let err = ensure_valid(&vlan(9999, "", "192.168.0.0/24", "192.168.1.1")).unwrap_err();
        assert_eq!(err.violations().len(), 3);
        assert_eq!(
            err.to_string(),
            "invalid VLAN ID 9999 (expected range 1..4094), name must not be empty, \
             gateway 192.168.1.1 must belong to subnet 192.168.0.0/24"
        );
    }

    #[test]
    fn duplicate_tags_and_any_status_are_accepted() {
        let mut a = vlan(42, "a", "10.0.0.0/24", "10.0.0.1");
        a.status = String::new();
        let mut b = vlan(42, "b", "10.0.1.0/24", "10.0.1.1");
        b.status = "whatever".into();
        assert!(validate(&a).is_empty());
        assert!(validate(&b).is_empty());
    }

    #[test]
    fn empty_violation_list_is_not_an_error() {
        assert!(ValidationError::new(Vec::new()).is_none());
    }

    proptest! {
        #[test]
        fn accepts_exactly_when_all_rules_hold(
            tag in any::<u16>(),
            name in "[a-z]{0,3}",
            net in any::<[u8; 4]>(),
            prefix in 0u8..=32,
            gw in any::<[u8; 4]>(),
        ) {
            let subnet = IpNet::new(IpAddr::from(net), prefix).unwrap();
            let gateway = IpAddr::from(gw);
            let v = Vlan {
                id: VlanId::new(),
                tag,
                name: name.clone(),
                subnet,
                gateway,
                status: String::new(),
            };
            let expected = (1..=4094).contains(&tag) && !name.is_empty() && subnet.contains(&gateway);
            prop_assert_eq!(validate(&v).is_empty(), expected);
        }
    }
}
