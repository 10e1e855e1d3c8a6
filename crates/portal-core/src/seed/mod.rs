//! Demo datasets
//!
//! Used as the fallback collection whenever nothing compatible is persisted.
//! Record ids are the short numeric ids of the demo portal, so links between
//! datasets (project members, team request → project) line up.

use chrono::{Duration, TimeZone, Utc};

use portal_shared::Timestamp;

use crate::domain::{
    Comment, Competition, CompetitionCategory, CompetitionLevel, CompetitionStatus, ForumPost, Project,
    ProjectCategory, ProjectStatus, Rating, SeedAccount, TeamRequest, User, UserRole,
};

const UNIVERSITY: &str = "University of Example";

fn date(year: i32, month: u32, day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn user(id: &str, name: &str, email: &str, role: UserRole, faculty: Option<&str>, skills: &[&str]) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        avatar: None,
        bio: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        university: faculty.map(|_| UNIVERSITY.to_string()),
        faculty: faculty.map(str::to_string),
        created_at: now,
        updated_at: now,
    }
}

fn admin() -> User {
    user("1", "Admin User", "admin@example.com", UserRole::Admin, None, &[])
}

fn student() -> User {
    user(
        "2",
        "Student User",
        "student@example.com",
        UserRole::Student,
        Some("Computer Science"),
        &["React", "JavaScript", "UI/UX"],
    )
}

fn lecturer() -> User {
    user("3", "Lecturer User", "lecturer@example.com", UserRole::Lecturer, Some("Engineering"), &[])
}

fn jane() -> User {
    user(
        "4",
        "Jane Doe",
        "jane.doe@example.com",
        UserRole::Student,
        Some("Computer Science"),
        &["Python", "Machine Learning", "Data Science"],
    )
}

fn john() -> User {
    user(
        "5",
        "John Smith",
        "john.smith@example.com",
        UserRole::Student,
        Some("Computer Science"),
        &["React Native", "Firebase", "Mobile Development"],
    )
}

/// Demo logins; passwords are hashed when the credential collection is seeded.
pub fn accounts() -> Vec<SeedAccount> {
    vec![
        SeedAccount { user: admin(), password: "admin123".to_string() },
        SeedAccount { user: student(), password: "student123".to_string() },
        SeedAccount { user: lecturer(), password: "lecturer123".to_string() },
    ]
}

pub fn competitions() -> Vec<Competition> {
    let now = Utc::now();
    let competition = |id: &str, title: &str, category: CompetitionCategory, level: CompetitionLevel| Competition {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        requirements: String::new(),
        category,
        level,
        status: CompetitionStatus::Upcoming,
        registration_start_date: now,
        registration_end_date: now,
        submission_deadline: now,
        announcement_date: now,
        organizer: String::new(),
        prize: String::new(),
        registration_link: String::new(),
        image: None,
        created_by: lecturer().id,
        approved: true,
        created_at: now,
        updated_at: now,
    };

    vec![
        Competition {
            description: "Kompetisi pembuatan aplikasi inovatif dalam waktu 48 jam.".to_string(),
            requirements: "Mahasiswa aktif, tim 3-5 orang, menguasai pemrograman dasar.".to_string(),
            registration_start_date: date(2025, 8, 10),
            registration_end_date: date(2025, 9, 10),
            submission_deadline: date(2025, 9, 15),
            announcement_date: date(2025, 9, 30),
            organizer: "Kementerian Pendidikan dan Kebudayaan".to_string(),
            prize: "Rp 50.000.000".to_string(),
            registration_link: "https://example.com/register".to_string(),
            image: Some("/assets/competitions/hackathon.jpg".to_string()),
            ..competition(
                "1",
                "Hackathon Nasional 2025",
                CompetitionCategory::InformationTechnology,
                CompetitionLevel::National,
            )
        },
        Competition {
            description: "Kompetisi desain antarmuka aplikasi untuk meningkatkan pengalaman pengguna.".to_string(),
            requirements: "Mahasiswa aktif, individu atau tim 2 orang, menguasai desain UI/UX.".to_string(),
            status: CompetitionStatus::Ongoing,
            registration_start_date: date(2025, 7, 1),
            registration_end_date: date(2025, 7, 25),
            submission_deadline: date(2025, 8, 15),
            announcement_date: date(2025, 8, 30),
            organizer: "Adobe & Google".to_string(),
            prize: "USD 5,000".to_string(),
            registration_link: "https://example.com/uiux-register".to_string(),
            image: Some("/assets/competitions/uiux.jpg".to_string()),
            ..competition(
                "2",
                "UI/UX Design Competition",
                CompetitionCategory::Design,
                CompetitionLevel::International,
            )
        },
        Competition {
            description: "Kompetisi pembuatan rencana bisnis inovatif untuk startup.".to_string(),
            requirements: "Mahasiswa aktif, tim 3-4 orang, fokus pada solusi bisnis berkelanjutan.".to_string(),
            registration_start_date: date(2025, 8, 15),
            registration_end_date: date(2025, 9, 15),
            submission_deadline: date(2025, 10, 1),
            announcement_date: date(2025, 10, 15),
            organizer: "Bank Indonesia".to_string(),
            prize: "Rp 75.000.000 dan Inkubasi Bisnis".to_string(),
            registration_link: "https://example.com/bizplan-register".to_string(),
            image: Some("/assets/competitions/business.jpg".to_string()),
            created_by: admin().id,
            ..competition(
                "3",
                "Business Plan Competition",
                CompetitionCategory::Business,
                CompetitionLevel::National,
            )
        },
    ]
}

fn rating(id: &str, rater: &User, project_id: &str, value: f64, comment: &str) -> Rating {
    Rating {
        id: id.to_string(),
        user_id: rater.id.clone(),
        user_name: rater.name.clone(),
        project_id: project_id.to_string(),
        rating: value,
        comment: Some(comment.to_string()),
        created_at: Utc::now(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn projects() -> Vec<Project> {
    let now = Utc::now();
    let project = |id: &str, title: &str, description: &str, category: ProjectCategory| Project {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        technologies: Vec::new(),
        images: Vec::new(),
        video_link: None,
        repository_link: None,
        demo_link: None,
        members: Vec::new(),
        owner_id: String::new(),
        status: ProjectStatus::default(),
        features: Vec::new(),
        challenges: None,
        future_improvements: None,
        ratings: Vec::new(),
        comments: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    vec![
        Project {
            technologies: strings(&["React", "Node.js", "MongoDB", "Express"]),
            images: strings(&["/assets/projects/educonnect1.jpg", "/assets/projects/educonnect2.jpg"]),
            video_link: Some("https://youtube.com/example".to_string()),
            repository_link: Some("https://github.com/example/educonnect".to_string()),
            demo_link: Some("https://educonnect-demo.example.com".to_string()),
            members: vec![student(), jane()],
            owner_id: student().id,
            ratings: vec![rating(
                "r1",
                &lecturer(),
                "1",
                4.5,
                "Proyek yang bagus dengan implementasi yang baik. Antarmuka pengguna sangat intuitif.",
            )],
            ..project(
                "1",
                "EduConnect - Platform Pembelajaran Online",
                "Aplikasi web yang menghubungkan mahasiswa dengan konten pembelajaran interaktif.",
                ProjectCategory::WebDevelopment,
            )
        },
        Project {
            technologies: strings(&["Arduino", "Python", "TensorFlow", "React Native"]),
            images: strings(&["/assets/projects/smartagri1.jpg", "/assets/projects/smartagri2.jpg"]),
            repository_link: Some("https://github.com/example/smartagri".to_string()),
            members: vec![jane(), john()],
            owner_id: jane().id,
            ..project(
                "2",
                "SmartAgri - Aplikasi IoT untuk Pertanian",
                "Sistem IoT untuk memantau dan mengoptimalkan proses pertanian dengan sensor dan machine learning.",
                ProjectCategory::Iot,
            )
        },
        Project {
            technologies: strings(&["Unity", "ARKit", "ARCore", "C#"]),
            images: strings(&["/assets/projects/virtualtour1.jpg"]),
            video_link: Some("https://youtube.com/example-vr".to_string()),
            repository_link: Some("https://github.com/example/virtualtour".to_string()),
            demo_link: Some("https://virtualtour-demo.example.com".to_string()),
            members: vec![john()],
            owner_id: john().id,
            ratings: vec![
                rating("r2", &admin(), "3", 5.0, "Implementasi AR/VR yang sangat menarik dan inovatif."),
                rating("r3", &lecturer(), "3", 4.8, "Konsep yang unik dan eksekusi yang sangat baik."),
            ],
            ..project(
                "3",
                "VirtualTour - Aplikasi VR untuk Wisata",
                "Aplikasi mobile yang menyediakan pengalaman wisata virtual dengan teknologi AR/VR.",
                ProjectCategory::MobileApp,
            )
        },
    ]
}

const HACKATHON_TIPS: &str = "# Tips Mengikuti Hackathon untuk Pemula

Halo teman-teman! Saya baru saja mengikuti hackathon nasional dan ingin berbagi beberapa tips bagi yang baru memulai:

1. **Bentuk tim dengan skill yang beragam** - Pastikan tim Anda memiliki developer, desainer UI/UX, dan orang yang fokus pada business model/pitch.
2. **Persiapkan template/boilerplate** - Siapkan kode dasar atau template sebelum hari-H untuk menghemat waktu.
3. **Fokus pada MVP (Minimum Viable Product)** - Jangan mencoba membangun aplikasi yang terlalu kompleks, fokuslah pada fitur utama yang berfungsi dengan baik.
4. **Perhatikan kriteria penilaian** - Pastikan solusi Anda sesuai dengan kriteria yang dinilai juri.
5. **Latih pitch Anda** - Presentasi yang bagus bisa jadi faktor penentu kemenangan.

Ada yang punya tips lain untuk dibagikan?";

const ML_FRAMEWORKS: &str = "Halo semua,

Saya sedang mengerjakan proyek klasifikasi gambar dan masih bingung framework mana yang sebaiknya digunakan. Saya sudah coba TensorFlow, tapi masih penasaran dengan PyTorch dan scikit-learn.

Bagi yang sudah berpengalaman, mana yang menurut kalian paling cocok untuk pemula dengan performa yang baik?

Terima kasih!";

fn comment(id: &str, content: &str, author: User, likes: u64, created_at: Timestamp) -> Comment {
    Comment { id: id.to_string(), content: content.to_string(), author, likes, created_at }
}

/// Timestamps are relative to now so the feed always looks fresh.
pub fn forum_posts() -> Vec<ForumPost> {
    let now = Utc::now();
    let tips_at = now - Duration::days(2);
    let frameworks_at = now - Duration::hours(36);

    vec![
        ForumPost {
            id: "1".to_string(),
            title: "Tips Mengikuti Hackathon untuk Pemula".to_string(),
            content: HACKATHON_TIPS.to_string(),
            author: student(),
            comments: vec![
                comment(
                    "c1",
                    "Terima kasih atas tipsnya! Saya menambahkan bahwa istirahat yang cukup juga sangat penting selama hackathon.",
                    jane(),
                    3,
                    now - Duration::days(1),
                ),
                comment(
                    "c2",
                    "Setuju dengan point #3. Lebih baik memiliki produk sederhana yang berfungsi sempurna daripada produk kompleks dengan banyak bug.",
                    lecturer(),
                    5,
                    now - Duration::hours(12),
                ),
            ],
            likes: 12,
            tags: strings(&["hackathon", "tips", "pemula"]),
            created_at: tips_at,
            updated_at: tips_at,
        },
        ForumPost {
            id: "2".to_string(),
            title: "Mencari Rekomendasi Framework untuk Machine Learning".to_string(),
            content: ML_FRAMEWORKS.to_string(),
            author: lecturer(),
            comments: vec![comment(
                "c3",
                "Untuk klasifikasi gambar, PyTorch cukup intuitif dan memiliki dokumentasi yang bagus untuk pemula.",
                student(),
                2,
                now - Duration::hours(10),
            )],
            likes: 7,
            tags: strings(&["machine learning", "framework", "AI"]),
            created_at: frameworks_at,
            updated_at: frameworks_at,
        },
    ]
}

pub fn team_requests() -> Vec<TeamRequest> {
    let now = Utc::now();
    let frontend_at = now - Duration::days(2);
    let backend_at = now - Duration::days(1);
    let student = student();
    let jane = jane();

    vec![
        TeamRequest {
            id: "1".to_string(),
            project_id: Some("1".to_string()),
            project_title: Some("EduConnect - Platform Pembelajaran Online".to_string()),
            description: "Mencari frontend developer untuk proyek EduConnect. Diutamakan yang menguasai React dan memiliki pengalaman dengan UI/UX design.".to_string(),
            required_skills: strings(&["React", "TypeScript", "UI/UX"]),
            deadline: Some(date(2025, 8, 15)),
            contact_info: student.email.clone(),
            user_id: student.id,
            user_name: student.name,
            positions_open: 1,
            created_at: frontend_at,
            updated_at: frontend_at,
        },
        TeamRequest {
            id: "2".to_string(),
            project_id: None,
            project_title: None,
            description: "Mencari anggota tim untuk lomba Hackathon Nasional 2025. Dibutuhkan backend developer dengan pengalaman Node.js dan database.".to_string(),
            required_skills: strings(&["Node.js", "MongoDB", "Express"]),
            deadline: Some(date(2025, 8, 1)),
            contact_info: jane.email.clone(),
            user_id: jane.id,
            user_name: jane.name,
            positions_open: 2,
            created_at: backend_at,
            updated_at: backend_at,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_seed_competitions_are_valid() {
        for competition in competitions() {
            assert!(competition.check().is_ok(), "{} is invalid", competition.title);
        }
    }

    #[test]
    fn test_seed_records_pass_validation() {
        assert!(projects().iter().all(|p| p.validate().is_ok()));
        assert!(forum_posts().iter().all(|p| p.validate().is_ok()));
        assert!(team_requests().iter().all(|r| r.validate().is_ok()));
    }

    #[test]
    fn test_seed_links_line_up() {
        let project_ids: Vec<_> = projects().into_iter().map(|p| p.id).collect();
        for request in team_requests() {
            if let Some(project_id) = request.project_id {
                assert!(project_ids.contains(&project_id));
            }
        }
        let emails: Vec<_> = accounts().into_iter().map(|a| a.user.email).collect();
        assert_eq!(emails, vec!["admin@example.com", "student@example.com", "lecturer@example.com"]);
    }

    #[test]
    fn test_seed_ratings_average() {
        let projects = projects();
        assert_eq!(projects[0].average_rating(), 4.5);
        assert_eq!(projects[1].average_rating(), 0.0);
        assert!((projects[2].average_rating() - 4.9).abs() < 1e-9);
    }
}
