use super::{FilterSpec, Searchable};
use crate::domain::{Company, Employer, Job, Student};

/// Case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn text_matches(value: &str, wanted: Option<&String>) -> bool {
    wanted.map_or(true, |wanted| contains_ignore_case(value, wanted))
}

fn optional_text_matches(value: Option<&str>, wanted: Option<&String>) -> bool {
    match wanted {
        Some(wanted) => value.is_some_and(|value| contains_ignore_case(value, wanted)),
        None => true,
    }
}

fn equals<T: PartialEq>(value: T, wanted: Option<T>) -> bool {
    wanted.map_or(true, |wanted| wanted == value)
}

impl Searchable for Job {
    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![
            self.title.as_str(),
            self.company.as_str(),
            self.description.as_str(),
        ];
        fields.extend(self.skills.iter().map(String::as_str));
        fields
    }

    fn skill_names(&self) -> Vec<&str> {
        self.skills.iter().map(String::as_str).collect()
    }

    fn matches_categories(&self, filters: &FilterSpec) -> bool {
        text_matches(&self.location, filters.location.as_ref())
            && equals(self.job_type, filters.job_type)
            && equals(self.experience_level, filters.experience_level)
            && equals(self.is_remote, filters.is_remote)
    }
}

impl Searchable for Student {
    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.full_name.as_str(), self.email.as_str()];
        fields.extend(self.university.as_deref());
        fields.extend(self.major.as_deref());
        fields.extend(self.skills.iter().map(|skill| skill.name.as_str()));
        fields
    }

    fn skill_names(&self) -> Vec<&str> {
        self.skills.iter().map(|skill| skill.name.as_str()).collect()
    }

    fn gpa(&self) -> Option<f32> {
        self.gpa
    }

    fn matches_categories(&self, filters: &FilterSpec) -> bool {
        optional_text_matches(self.major.as_deref(), filters.major.as_ref())
    }
}

impl Searchable for Employer {
    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![
            self.full_name.as_str(),
            self.email.as_str(),
            self.company.name.as_str(),
            self.company.industry.as_str(),
        ];
        fields.extend(self.position.as_deref());
        fields
    }

    fn matches_categories(&self, filters: &FilterSpec) -> bool {
        self.company.matches_categories(filters)
    }
}

impl Searchable for Company {
    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.industry.as_str()];
        fields.extend(self.description.as_deref());
        fields.extend(self.city.as_deref());
        fields
    }

    fn matches_categories(&self, filters: &FilterSpec) -> bool {
        let located = match &filters.location {
            Some(wanted) => [&self.address, &self.city, &self.state, &self.country]
                .into_iter()
                .flatten()
                .any(|part| contains_ignore_case(part, wanted)),
            None => true,
        };

        located
            && text_matches(&self.industry, filters.industry.as_ref())
            && match filters.company_size {
                Some(size) => self.company_size == Some(size),
                None => true,
            }
            && equals(self.is_verified, filters.is_verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompanySize, ExperienceLevel, JobType, StudentSkill};
    use crate::query::query;
    use chrono::{TimeZone, Utc};

    fn job(id: &str, title: &str, location: &str, remote: bool, skills: &[&str]) -> Job {
        Job {
            id: id.to_string(),
            title: title.to_string(),
            company: "Lotus Labs".to_string(),
            company_id: "1".to_string(),
            description: String::new(),
            requirements: Vec::new(),
            responsibilities: None,
            salary: None,
            location: location.to_string(),
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::Junior,
            skills: skills.iter().map(|skill| skill.to_string()).collect(),
            posted_date: Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap(),
            application_deadline: None,
            status: Default::default(),
            employer_id: "1".to_string(),
            view_count: 0,
            application_count: 0,
            is_remote: remote,
        }
    }

    fn student(id: &str, major: Option<&str>, gpa: Option<f32>, skills: &[&str]) -> Student {
        Student {
            id: id.to_string(),
            user_id: format!("u-{id}"),
            full_name: format!("Student {id}"),
            email: format!("s{id}@uni.edu"),
            university: Some("HUST".to_string()),
            major: major.map(str::to_string),
            graduation_year: None,
            gpa,
            bio: None,
            phone: None,
            resume_url: None,
            skills: skills
                .iter()
                .enumerate()
                .map(|(index, name)| StudentSkill {
                    id: format!("{id}-{index}"),
                    name: name.to_string(),
                    level: None,
                })
                .collect(),
            experiences: Vec::new(),
        }
    }

    #[test]
    fn job_text_search_covers_skills() {
        let jobs = vec![
            job("1", "Backend Engineer", "Hanoi", false, &["Rust"]),
            job("2", "Designer", "Hanoi", false, &["Figma"]),
        ];
        let filters = FilterSpec {
            query: Some("rust".to_string()),
            ..FilterSpec::default()
        };

        let page = query(&jobs, &filters);

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "1");
    }

    #[test]
    fn job_location_is_a_case_insensitive_substring() {
        let jobs = vec![
            job("1", "A", "Ho Chi Minh City", true, &[]),
            job("2", "B", "Hanoi", true, &[]),
            job("3", "C", "ho chi minh", false, &[]),
        ];
        let filters = FilterSpec {
            location: Some("HO CHI".to_string()),
            is_remote: Some(true),
            ..FilterSpec::default()
        };

        let page = query(&jobs, &filters);

        assert_eq!(page.items.iter().map(|job| job.id.as_str()).collect::<Vec<_>>(), vec!["1"]);
    }

    #[test]
    fn student_filters_on_major_gpa_and_skills() {
        let students = vec![
            student("1", Some("Computer Science"), Some(3.6), &["Python", "SQL"]),
            student("2", Some("Computer Science"), None, &["Python"]),
            student("3", Some("Economics"), Some(3.9), &["Excel"]),
            student("4", None, Some(3.8), &["PostgreSQL"]),
        ];
        let filters = FilterSpec {
            major: Some("computer".to_string()),
            gpa: Some(3.5),
            skills: vec!["sql".to_string()],
            ..FilterSpec::default()
        };

        let page = query(&students, &filters);

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "1");
    }

    #[test]
    fn company_size_filter_requires_a_known_size() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut sized = crate::domain::CompanyDraft {
            name: "Sized".to_string(),
            industry: "Finance".to_string(),
            ..Default::default()
        }
        .into_company("1".to_string(), now);
        sized.company_size = Some(CompanySize::Small);
        let unsized_company = crate::domain::CompanyDraft {
            name: "Unsized".to_string(),
            industry: "Finance".to_string(),
            ..Default::default()
        }
        .into_company("2".to_string(), now);

        let filters = FilterSpec {
            company_size: Some(CompanySize::Small),
            industry: Some("fin".to_string()),
            ..FilterSpec::default()
        };

        let page = query(&[sized, unsized_company], &filters);

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Sized");
    }
}
