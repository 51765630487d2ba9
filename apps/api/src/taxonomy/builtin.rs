//! Built-in skills catalog. Canonical names must stay unique (case-insensitive).

/// (canonical name, category, keyword variants)
pub(super) const BUILTIN_SKILLS: &[(&str, &str, &[&str])] = &[
    // Programming languages
    ("JavaScript", "Programming Languages", &["javascript", "ecmascript", "es6"]),
    ("TypeScript", "Programming Languages", &["typescript"]),
    ("Python", "Programming Languages", &["python", "python3"]),
    ("Java", "Programming Languages", &["java", "jvm"]),
    ("C++", "Programming Languages", &["c++", "cpp"]),
    ("C#", "Programming Languages", &["c#", "csharp"]),
    ("Golang", "Programming Languages", &["golang"]),
    ("Rust", "Programming Languages", &["rust", "rustlang"]),
    ("Ruby", "Programming Languages", &["ruby"]),
    ("PHP", "Programming Languages", &["php"]),
    ("Swift", "Programming Languages", &["swift"]),
    ("Kotlin", "Programming Languages", &["kotlin"]),
    ("SQL", "Programming Languages", &["sql", "t-sql", "pl/sql"]),
    // Frontend
    ("React", "Frontend", &["react", "reactjs", "react.js"]),
    ("Angular", "Frontend", &["angular", "angularjs"]),
    ("Vue.js", "Frontend", &["vue", "vuejs", "vue.js"]),
    ("Next.js", "Frontend", &["nextjs", "next.js"]),
    ("HTML", "Frontend", &["html", "html5"]),
    ("CSS", "Frontend", &["css", "css3", "sass", "scss"]),
    ("Redux", "Frontend", &["redux"]),
    ("Tailwind CSS", "Frontend", &["tailwind", "tailwindcss"]),
    // Backend
    ("Node.js", "Backend", &["node.js", "nodejs"]),
    ("Express", "Backend", &["expressjs", "express.js"]),
    ("Django", "Backend", &["django"]),
    ("Flask", "Backend", &["flask"]),
    ("FastAPI", "Backend", &["fastapi"]),
    ("Spring Boot", "Backend", &["spring boot", "springboot", "spring framework"]),
    ("Ruby on Rails", "Backend", &["rails", "ruby on rails"]),
    ("GraphQL", "Backend", &["graphql"]),
    ("REST APIs", "Backend", &["rest api", "restful", "rest apis"]),
    ("Microservices", "Backend", &["microservices", "microservice"]),
    // Databases
    ("PostgreSQL", "Databases", &["postgresql", "postgres"]),
    ("MySQL", "Databases", &["mysql"]),
    ("MongoDB", "Databases", &["mongodb", "mongo"]),
    ("Redis", "Databases", &["redis"]),
    ("Elasticsearch", "Databases", &["elasticsearch", "elastic search"]),
    ("DynamoDB", "Databases", &["dynamodb"]),
    // Cloud & DevOps
    ("AWS", "Cloud & DevOps", &["aws", "amazon web services", "ec2", "aws lambda"]),
    ("Azure", "Cloud & DevOps", &["azure", "microsoft azure"]),
    ("Google Cloud", "Cloud & DevOps", &["gcp", "google cloud", "google cloud platform"]),
    ("Docker", "Cloud & DevOps", &["docker", "dockerfile", "containerization"]),
    ("Kubernetes", "Cloud & DevOps", &["kubernetes", "k8s"]),
    ("Terraform", "Cloud & DevOps", &["terraform"]),
    (
        "CI/CD",
        "Cloud & DevOps",
        &["ci/cd", "continuous integration", "continuous delivery", "github actions", "jenkins"],
    ),
    ("Linux", "Cloud & DevOps", &["linux", "unix"]),
    // Data & ML
    ("Machine Learning", "Data & ML", &["machine learning"]),
    ("Deep Learning", "Data & ML", &["deep learning", "neural networks"]),
    ("TensorFlow", "Data & ML", &["tensorflow"]),
    ("PyTorch", "Data & ML", &["pytorch"]),
    ("Pandas", "Data & ML", &["pandas"]),
    ("Apache Spark", "Data & ML", &["pyspark", "apache spark", "spark sql"]),
    ("Kafka", "Data & ML", &["kafka"]),
    ("Data Analysis", "Data & ML", &["data analysis", "data analytics"]),
    // Testing
    ("Jest", "Testing", &["jest"]),
    ("Cypress", "Testing", &["cypress"]),
    ("Selenium", "Testing", &["selenium"]),
    ("Unit Testing", "Testing", &["unit testing", "unit tests", "tdd", "test-driven"]),
    // Methodologies
    ("Agile", "Methodologies", &["agile", "scrum", "kanban"]),
    ("System Design", "Methodologies", &["system design", "distributed systems"]),
    // Soft skills
    ("Leadership", "Soft Skills", &["leadership", "mentoring", "mentored"]),
    ("Communication", "Soft Skills", &["communication", "public speaking"]),
    ("Problem Solving", "Soft Skills", &["problem solving", "problem-solving", "troubleshooting"]),
    ("Teamwork", "Soft Skills", &["teamwork", "collaboration", "cross-functional"]),
];
