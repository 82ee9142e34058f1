// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn sample_persona_carries_requested_modules() {
    let persona = sample_persona("devops", vec!["git".to_string(), "jira".to_string()]);
    assert_eq!(persona.modules, vec!["git", "jira"]);
}

#[cfg(feature = "proptest")]
mod proptest_strategies {
    use super::strategies::*;
    use crate::autoheal::FailureClass;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn arb_failure_body_always_classifies(body in arb_failure_body()) {
            let class = FailureClass::classify(true, &body);
            prop_assert!(matches!(
                class,
                FailureClass::Auth | FailureClass::Network | FailureClass::Unknown
            ));
        }
    }
}
