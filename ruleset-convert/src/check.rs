use serde::Serialize;

use crate::list::RuleList;
use crate::rule_types::RuleTypeTable;

/// Result of sanity-checking one rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListCheck {
    pub total_lines: usize,
    pub valid_rules: usize,
    pub unknown_rules: usize,
    pub malformed_lines: usize,
    /// False only for an empty file.
    pub passed: bool,
}

pub fn check_rule_list(list: &RuleList, table: &RuleTypeTable) -> ListCheck {
    let valid_rules = list
        .rules
        .iter()
        .filter(|rule| table.is_known(&rule.rule_type))
        .count();

    ListCheck {
        total_lines: list.total_lines,
        valid_rules,
        unknown_rules: list.rules.len() - valid_rules,
        malformed_lines: list.malformed.len(),
        passed: list.total_lines > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::check_rule_list;
    use crate::list::parse_rule_list;
    use crate::rule_types::default_rule_types;

    #[test]
    fn counts_known_and_unknown_rules() {
        let list = parse_rule_list("# c\nDOMAIN,a.com\nFOO,bar\nUSER-AGENT,x\nbad\n");
        let check = check_rule_list(&list, &default_rule_types());

        assert_eq!(check.total_lines, 5);
        assert_eq!(check.valid_rules, 2);
        assert_eq!(check.unknown_rules, 1);
        assert_eq!(check.malformed_lines, 1);
        assert!(check.passed);
    }

    #[test]
    fn empty_file_fails() {
        let check = check_rule_list(&parse_rule_list(""), &default_rule_types());
        assert!(!check.passed);
    }
}
