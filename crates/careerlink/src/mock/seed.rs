use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::store::Tables;
use crate::domain::{
    ApplicationStatus, AuthUser, Company, CompanySize, CvView, Employer, ExperienceLevel, Job,
    JobApplication, JobStatus, JobType, Salary, SalaryPeriod, Skill, Student, StudentExperience,
    StudentSkill, UserRole,
};

/// Bearer token of the seeded administrator.
pub const DEMO_ADMIN_TOKEN: &str = "demo-admin-token";
/// Bearer token of the seeded employer account.
pub const DEMO_EMPLOYER_TOKEN: &str = "demo-employer-token";

pub(super) fn sample_tables(now: DateTime<Utc>) -> Tables {
    let companies = vec![
        company("1", "Lotus Labs", "Software", "Hanoi", Some(CompanySize::Medium), true, now),
        company("2", "Mekong Finance", "Finance", "Ho Chi Minh City", Some(CompanySize::Large), true, now),
        company("3", "Sao Mai Studio", "Design", "Da Nang", None, false, now),
    ];

    let employers = vec![
        employer("1", "11", &companies[0], "Tran Minh Anh", "anh.tran@lotuslabs.vn", "Engineering Manager", now),
        employer("2", "12", &companies[1], "Le Thu Ha", "ha.le@mekongfinance.vn", "Talent Partner", now),
        employer("3", "13", &companies[2], "Pham Quoc Bao", "bao.pham@saomai.studio", "Founder", now),
    ];

    let mut jobs = vec![
        job(JobSeed {
            id: "1",
            title: "Backend Engineer Intern",
            employer: &employers[0],
            location: "Hanoi",
            job_type: JobType::Internship,
            level: ExperienceLevel::Entry,
            skills: &["Rust", "PostgreSQL", "Docker"],
            salary: Some((300, 500, SalaryPeriod::Monthly)),
            is_remote: false,
            posted: now - Duration::days(3),
        }),
        job(JobSeed {
            id: "2",
            title: "Frontend Developer",
            employer: &employers[0],
            location: "Hanoi",
            job_type: JobType::FullTime,
            level: ExperienceLevel::Junior,
            skills: &["TypeScript", "React", "CSS"],
            salary: Some((900, 1400, SalaryPeriod::Monthly)),
            is_remote: true,
            posted: now - Duration::days(5),
        }),
        job(JobSeed {
            id: "3",
            title: "Data Analyst",
            employer: &employers[1],
            location: "Ho Chi Minh City",
            job_type: JobType::FullTime,
            level: ExperienceLevel::Junior,
            skills: &["SQL", "Python", "Power BI"],
            salary: None,
            is_remote: false,
            posted: now - Duration::days(8),
        }),
        job(JobSeed {
            id: "4",
            title: "Risk Modelling Intern",
            employer: &employers[1],
            location: "Ho Chi Minh City",
            job_type: JobType::Internship,
            level: ExperienceLevel::Entry,
            skills: &["Python", "Statistics"],
            salary: Some((250, 400, SalaryPeriod::Monthly)),
            is_remote: false,
            posted: now - Duration::days(1),
        }),
        job(JobSeed {
            id: "5",
            title: "Product Designer",
            employer: &employers[2],
            location: "Da Nang",
            job_type: JobType::Contract,
            level: ExperienceLevel::Mid,
            skills: &["Figma", "User Research"],
            salary: Some((15, 25, SalaryPeriod::Hourly)),
            is_remote: true,
            posted: now - Duration::days(12),
        }),
        job(JobSeed {
            id: "6",
            title: "Part-time Motion Designer",
            employer: &employers[2],
            location: "Da Nang",
            job_type: JobType::PartTime,
            level: ExperienceLevel::Junior,
            skills: &["After Effects", "Figma"],
            salary: None,
            is_remote: false,
            posted: now - Duration::days(20),
        }),
    ];

    let mut students = vec![
        student(StudentSeed {
            id: "1",
            user_id: "21",
            name: "Nguyen Van Khoa",
            university: "Hanoi University of Science and Technology",
            major: "Computer Science",
            gpa: Some(3.6),
            skills: &[("Rust", Some("intermediate")), ("SQL", Some("advanced"))],
        }),
        student(StudentSeed {
            id: "2",
            user_id: "22",
            name: "Do Thi Mai",
            university: "University of Economics Ho Chi Minh City",
            major: "Finance",
            gpa: Some(3.8),
            skills: &[("Python", Some("advanced")), ("Excel", None)],
        }),
        student(StudentSeed {
            id: "3",
            user_id: "23",
            name: "Hoang Gia Huy",
            university: "Da Nang University of Architecture",
            major: "Graphic Design",
            gpa: None,
            skills: &[("Figma", Some("advanced"))],
        }),
        student(StudentSeed {
            id: "4",
            user_id: "24",
            name: "Vu Thanh Tam",
            university: "Hanoi University of Science and Technology",
            major: "Data Science",
            gpa: Some(3.2),
            skills: &[("Python", None), ("PostgreSQL", Some("beginner"))],
        }),
    ];
    students[0].experiences.push(StudentExperience {
        id: "1".to_string(),
        title: "Teaching Assistant".to_string(),
        company: "HUST".to_string(),
        start_date: date(2024, 2, 1),
        end_date: Some(date(2024, 6, 30)),
        description: Some("Ran lab sessions for Data Structures".to_string()),
    });

    let mut applications = vec![
        application("1", &jobs[0], &students[0], now - Duration::days(2)),
        application("2", &jobs[2], &students[1], now - Duration::days(6)),
    ];
    applications[1].status = ApplicationStatus::Reviewing;
    applications[1].reviewed_at = Some(now - Duration::days(4));
    applications[1].updated_at = now - Duration::days(4);

    for application in &applications {
        if let Some(job) = jobs.iter_mut().find(|job| job.id == application.job_id) {
            job.application_count += 1;
        }
    }

    let skills = [
        ("Rust", "Programming"),
        ("Python", "Programming"),
        ("TypeScript", "Programming"),
        ("SQL", "Data"),
        ("PostgreSQL", "Data"),
        ("Figma", "Design"),
        ("Docker", "DevOps"),
        ("Communication", "Soft skills"),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (name, category))| Skill {
        id: (index + 1).to_string(),
        name: name.to_string(),
        category: Some(category.to_string()),
    })
    .collect();

    let cv_views = vec![CvView {
        id: "1".to_string(),
        student_id: "1".to_string(),
        employer_id: "1".to_string(),
        viewed_at: now - Duration::hours(20),
    }];

    let users = vec![
        AuthUser {
            id: "1".to_string(),
            email: "admin@careerlink.vn".to_string(),
            name: "CareerLink Admin".to_string(),
            role: UserRole::Admin,
            authenticated: true,
            token: Some(DEMO_ADMIN_TOKEN.to_string()),
        },
        AuthUser {
            id: "11".to_string(),
            email: employers[0].email.clone(),
            name: employers[0].full_name.clone(),
            role: UserRole::Employer,
            authenticated: true,
            token: Some(DEMO_EMPLOYER_TOKEN.to_string()),
        },
    ];

    Tables {
        jobs,
        applications,
        companies,
        employers,
        students,
        skills,
        cv_views,
        users,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn company(
    id: &str,
    name: &str,
    industry: &str,
    city: &str,
    company_size: Option<CompanySize>,
    is_verified: bool,
    now: DateTime<Utc>,
) -> Company {
    Company {
        id: id.to_string(),
        name: name.to_string(),
        industry: industry.to_string(),
        description: Some(format!("{name} hires students across Vietnam.")),
        website: None,
        logo_url: None,
        address: None,
        city: Some(city.to_string()),
        state: None,
        country: Some("Vietnam".to_string()),
        phone: None,
        company_size,
        founded_year: None,
        is_verified,
        created_at: now - Duration::days(90),
        updated_at: now - Duration::days(30),
    }
}

fn employer(
    id: &str,
    user_id: &str,
    company: &Company,
    full_name: &str,
    email: &str,
    position: &str,
    now: DateTime<Utc>,
) -> Employer {
    Employer {
        id: id.to_string(),
        user_id: user_id.to_string(),
        company_id: company.id.clone(),
        full_name: full_name.to_string(),
        email: email.to_string(),
        position: Some(position.to_string()),
        phone: None,
        company: company.clone(),
        created_by: Some("1".to_string()),
        created_at: now - Duration::days(60),
        updated_at: now - Duration::days(60),
    }
}

struct JobSeed<'a> {
    id: &'a str,
    title: &'a str,
    employer: &'a Employer,
    location: &'a str,
    job_type: JobType,
    level: ExperienceLevel,
    skills: &'a [&'a str],
    salary: Option<(u64, u64, SalaryPeriod)>,
    is_remote: bool,
    posted: DateTime<Utc>,
}

fn job(seed: JobSeed<'_>) -> Job {
    Job {
        id: seed.id.to_string(),
        title: seed.title.to_string(),
        company: seed.employer.company.name.clone(),
        company_id: seed.employer.company_id.clone(),
        description: format!(
            "{} at {} working on real products with a mentor.",
            seed.title, seed.employer.company.name
        ),
        requirements: vec![
            "Currently enrolled or recently graduated".to_string(),
            "Good written English".to_string(),
        ],
        responsibilities: None,
        salary: seed.salary.map(|(min, max, period)| Salary {
            min: Some(min),
            max: Some(max),
            currency: "USD".to_string(),
            period,
        }),
        location: seed.location.to_string(),
        job_type: seed.job_type,
        experience_level: seed.level,
        skills: seed.skills.iter().map(|skill| skill.to_string()).collect(),
        posted_date: seed.posted,
        application_deadline: Some(seed.posted + Duration::days(30)),
        status: JobStatus::Active,
        employer_id: seed.employer.id.clone(),
        view_count: 0,
        application_count: 0,
        is_remote: seed.is_remote,
    }
}

struct StudentSeed<'a> {
    id: &'a str,
    user_id: &'a str,
    name: &'a str,
    university: &'a str,
    major: &'a str,
    gpa: Option<f32>,
    skills: &'a [(&'a str, Option<&'a str>)],
}

fn student(seed: StudentSeed<'_>) -> Student {
    let handle = seed.name.to_lowercase().replace(' ', ".");
    Student {
        id: seed.id.to_string(),
        user_id: seed.user_id.to_string(),
        full_name: seed.name.to_string(),
        email: format!("{handle}@student.edu.vn"),
        university: Some(seed.university.to_string()),
        major: Some(seed.major.to_string()),
        graduation_year: Some(2026),
        gpa: seed.gpa,
        bio: None,
        phone: None,
        resume_url: None,
        skills: seed
            .skills
            .iter()
            .enumerate()
            .map(|(index, (name, level))| StudentSkill {
                id: format!("{}{}", seed.id, index + 1),
                name: name.to_string(),
                level: level.map(str::to_string),
            })
            .collect(),
        experiences: Vec::new(),
    }
}

fn application(id: &str, job: &Job, student: &Student, applied_at: DateTime<Utc>) -> JobApplication {
    JobApplication {
        id: id.to_string(),
        job_id: job.id.clone(),
        student_id: student.id.clone(),
        cover_letter: Some(format!("I would love to join {} as {}.", job.company, job.title)),
        resume_url: None,
        status: ApplicationStatus::Pending,
        applied_at,
        updated_at: applied_at,
        reviewed_at: None,
        employer_notes: None,
        rejection_reason: None,
    }
}
