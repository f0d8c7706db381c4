use store::Owner;

use crate::validation::ValidationOutcome;

/// Checks the contact details of an owner.
///
/// Every text field is required and the telephone must be exactly ten digits.
pub fn validate_owner(owner: &Owner, outcome: &mut ValidationOutcome) {
    let required = [
        ("firstName", &owner.first_name),
        ("lastName", &owner.last_name),
        ("address", &owner.address),
        ("city", &owner.city),
        ("telephone", &owner.telephone),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            outcome.reject_value(field, "required", "must not be blank");
        }
    }

    let telephone = owner.telephone.trim();
    if !telephone.is_empty()
        && (telephone.len() != 10 || !telephone.chars().all(|c| c.is_ascii_digit()))
    {
        outcome.reject_value(
            "telephone",
            "telephone",
            "Telephone must be a 10-digit number.",
        );
    }
}
