//! Resident Registration Form
//!
//! The largest form kind: personal details, two cascading addresses with a
//! "same as permanent" mirror, PWD gating, valid-ID and profile-picture
//! attachments, and the duplicate pre-check probe.

use crate::address::SelectionResolver;
use crate::attachments::{AttachmentAggregator, BudgetPolicy};
use crate::submit::{DuplicateProbe, SubmissionPayload, SubmitForm};
use crate::validation::{evaluate, FieldRule, FieldValue, PatternKind, RuleKind, Violation};

/// Sentinel religion value that requires the free-text field.
pub const RELIGION_OTHERS: &str = "Others";

#[derive(Debug)]
pub struct RegistrationForm {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub suffix: String,
    pub birth_date: String,
    pub gender: String,
    pub civil_status: String,
    pub religion: String,
    pub other_religion: String,
    pub mobile_number: String,
    pub email: String,
    pub pwd: bool,
    pub pwd_id_number: String,
    pub permanent_address: SelectionResolver,
    pub present_address: SelectionResolver,
    same_as_permanent: bool,
    pub valid_ids: AttachmentAggregator,
    pub profile_picture: AttachmentAggregator,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            middle_name: String::new(),
            last_name: String::new(),
            suffix: String::new(),
            birth_date: String::new(),
            gender: String::new(),
            civil_status: String::new(),
            religion: String::new(),
            other_religion: String::new(),
            mobile_number: String::new(),
            email: String::new(),
            pwd: false,
            pwd_id_number: String::new(),
            permanent_address: SelectionResolver::new(),
            present_address: SelectionResolver::new(),
            same_as_permanent: false,
            valid_ids: AttachmentAggregator::new(BudgetPolicy::identity_documents()),
            profile_picture: AttachmentAggregator::new(BudgetPolicy::profile_picture()),
        }
    }
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the present-address mirror. Enabling deep-copies the
    /// permanent address; disabling reverts the present address to empty.
    pub fn set_same_as_permanent(&mut self, same: bool) {
        if same == self.same_as_permanent {
            return;
        }
        self.same_as_permanent = same;
        if same {
            let snapshot = self.permanent_address.selection().clone();
            self.present_address.mirror_from(&snapshot);
        } else {
            self.present_address.clear_mirror();
        }
    }

    pub fn same_as_permanent(&self) -> bool {
        self.same_as_permanent
    }

    /// Toggle the PWD flag; clearing it also drops the dependent id number.
    pub fn set_pwd(&mut self, pwd: bool) {
        self.pwd = pwd;
        if !pwd {
            self.pwd_id_number.clear();
        }
    }

    pub fn rules() -> Vec<FieldRule<Self>> {
        vec![
            FieldRule {
                key: "first_name",
                label: "First Name",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.first_name.clone()),
            },
            FieldRule {
                key: "first_name",
                label: "First Name",
                applies_when: |_| true,
                kind: RuleKind::AlphaOnly,
                value_of: |f| FieldValue::Text(f.first_name.clone()),
            },
            FieldRule {
                key: "last_name",
                label: "Last Name",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.last_name.clone()),
            },
            FieldRule {
                key: "last_name",
                label: "Last Name",
                applies_when: |_| true,
                kind: RuleKind::AlphaOnly,
                value_of: |f| FieldValue::Text(f.last_name.clone()),
            },
            FieldRule {
                key: "birth_date",
                label: "Birth Date",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.birth_date.clone()),
            },
            FieldRule {
                key: "gender",
                label: "Gender",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.gender.clone()),
            },
            FieldRule {
                key: "civil_status",
                label: "Civil Status",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.civil_status.clone()),
            },
            FieldRule {
                key: "religion",
                label: "Religion",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.religion.clone()),
            },
            FieldRule {
                key: "other_religion",
                label: "Other Religion",
                applies_when: |f| f.religion == RELIGION_OTHERS,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.other_religion.clone()),
            },
            FieldRule {
                key: "mobile_number",
                label: "Mobile Number",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.mobile_number.clone()),
            },
            FieldRule {
                key: "mobile_number",
                label: "Mobile Number",
                applies_when: |_| true,
                kind: RuleKind::Pattern(PatternKind::MobileNumber),
                value_of: |f| FieldValue::Text(f.mobile_number.clone()),
            },
            FieldRule {
                key: "email",
                label: "Email",
                applies_when: |_| true,
                kind: RuleKind::Pattern(PatternKind::Email),
                value_of: |f| FieldValue::Text(f.email.clone()),
            },
            FieldRule {
                key: "pwd_id_number",
                label: "PWD ID Number",
                applies_when: |f| f.pwd,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.pwd_id_number.clone()),
            },
            // Permanent address chain.
            FieldRule {
                key: "permanent_address.region",
                label: "Permanent Region",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| selected_name(f.permanent_address.selection().region.as_ref()),
            },
            FieldRule {
                key: "permanent_address.province",
                label: "Permanent Province",
                applies_when: |f| !f.permanent_address.selection().is_ncr(),
                kind: RuleKind::Required,
                value_of: |f| selected_name(f.permanent_address.selection().province.as_ref()),
            },
            FieldRule {
                key: "permanent_address.city",
                label: "Permanent City/Municipality",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| selected_name(f.permanent_address.selection().city.as_ref()),
            },
            FieldRule {
                key: "permanent_address.barangay",
                label: "Permanent Barangay",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| selected_name(f.permanent_address.selection().barangay.as_ref()),
            },
            FieldRule {
                key: "permanent_address.street",
                label: "Permanent Street Address",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.permanent_address.selection().street.clone()),
            },
            // Present address chain, waived entirely by the mirror toggle.
            FieldRule {
                key: "present_address.region",
                label: "Present Region",
                applies_when: |f| !f.same_as_permanent,
                kind: RuleKind::Required,
                value_of: |f| selected_name(f.present_address.selection().region.as_ref()),
            },
            FieldRule {
                key: "present_address.province",
                label: "Present Province",
                applies_when: |f| !f.same_as_permanent && !f.present_address.selection().is_ncr(),
                kind: RuleKind::Required,
                value_of: |f| selected_name(f.present_address.selection().province.as_ref()),
            },
            FieldRule {
                key: "present_address.city",
                label: "Present City/Municipality",
                applies_when: |f| !f.same_as_permanent,
                kind: RuleKind::Required,
                value_of: |f| selected_name(f.present_address.selection().city.as_ref()),
            },
            FieldRule {
                key: "present_address.barangay",
                label: "Present Barangay",
                applies_when: |f| !f.same_as_permanent,
                kind: RuleKind::Required,
                value_of: |f| selected_name(f.present_address.selection().barangay.as_ref()),
            },
            FieldRule {
                key: "present_address.street",
                label: "Present Street Address",
                applies_when: |f| !f.same_as_permanent,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.present_address.selection().street.clone()),
            },
            FieldRule {
                key: "valid_ids",
                label: "Valid ID",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Count(f.valid_ids.len()),
            },
        ]
    }
}

fn selected_name(item: Option<&crate::address::RefItem>) -> FieldValue {
    FieldValue::Text(item.map(|i| i.name.clone()).unwrap_or_default())
}

impl SubmitForm for RegistrationForm {
    fn resource(&self) -> &'static str {
        "resident"
    }

    fn resource_label(&self) -> &'static str {
        "registration"
    }

    fn violations(&self) -> Vec<Violation> {
        evaluate(self, &Self::rules())
    }

    fn payload(&self) -> SubmissionPayload {
        let mut payload = SubmissionPayload::new();
        payload.push_text("first_name", self.first_name.trim());
        payload.push_text_opt("middle_name", &self.middle_name);
        payload.push_text("last_name", self.last_name.trim());
        payload.push_text_opt("suffix", &self.suffix);
        payload.push_text("birth_date", self.birth_date.trim());
        payload.push_text("gender", self.gender.as_str());
        payload.push_text("civil_status", self.civil_status.as_str());
        let religion = if self.religion == RELIGION_OTHERS {
            self.other_religion.trim()
        } else {
            self.religion.as_str()
        };
        payload.push_text("religion", religion);
        payload.push_text("mobile_number", self.mobile_number.trim());
        payload.push_text_opt("email", &self.email);
        payload.push_flag("pwd", self.pwd);
        if self.pwd {
            payload.push_text("pwd_id_number", self.pwd_id_number.trim());
        }
        payload.push_address("permanent_address", self.permanent_address.selection());
        payload.push_address("present_address", self.present_address.selection());
        payload.push_flag("same_as_permanent", self.same_as_permanent);
        payload.push_files("valid_ids[]", &self.valid_ids);
        payload.push_files("profile_picture", &self.profile_picture);
        payload
    }

    fn duplicate_probe(&self) -> Option<DuplicateProbe> {
        Some(DuplicateProbe {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date: self.birth_date.clone(),
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
