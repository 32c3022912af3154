//! Test fixtures - a minimal installed Hyperf project.

pub const COMPOSER_JSON: &str = r#"{
    "name": "acme/shop",
    "type": "project",
    "bin": ["bin/hyperf.php"],
    "require": {
        "hyperf/config": "~3.1",
        "psr/log": "^3.0"
    }
}
"#;

pub const ENTRY_POINT: &str = r#"#!/usr/bin/env php
<?php

declare(strict_types=1);

ini_set('display_errors', 'on');

! defined('BASE_PATH') && define('BASE_PATH', dirname(__DIR__, 1));

require BASE_PATH . '/vendor/autoload.php';

(function () {
    $application = new Hyperf\Console\Application();
    $application->run();
})();
"#;

pub const CONFIG_PHP: &str = r#"<?php

declare(strict_types=1);

use Hyperf\Contract\StdoutLoggerInterface;

return [
    'app_name' => env('APP_NAME', 'shop'),
    'scan_cacheable' => env('SCAN_CACHEABLE', false),
    StdoutLoggerInterface::class => [
        'log_level' => ['error', 'info'],
    ],
];
"#;

pub const CONFIG_FACTORY_PHP: &str = r#"<?php

declare(strict_types=1);

namespace Hyperf\Config;

use Symfony\Component\Finder\Finder;

class ConfigFactory
{
    public function __invoke()
    {
        $configPath = BASE_PATH . '/config/';
        $config = $this->readConfig($configPath . 'config.php');
        $autoloadConfig = $this->readPaths([BASE_PATH . '/config/autoload']);
        return new Config(array_replace_recursive($config, ...$autoloadConfig));
    }

    private function readConfig(string $configPath): array
    {
        $config = [];
        if (file_exists($configPath) && is_readable($configPath)) {
            $config = require $configPath;
        }
        return is_array($config) ? $config : [];
    }

    private function readPaths(array $paths): array
    {
        $configs = [];
        $finder = new Finder();
        $finder->files()->in($paths)->name('*.php');
        foreach ($finder as $file) {
            $config = [];
            $key = implode('.', array_filter([
                str_replace('/', '.', $file->getRelativePath()),
                $file->getBasename('.php'),
            ]));
            array_set($config, $key, require $file->getRealPath());
            $configs[] = $config;
        }
        return $configs;
    }
}
"#;

pub const INSTALLED_JSON: &str = r#"{
    "packages": [
        {
            "name": "hyperf/config",
            "version": "v3.1.0",
            "type": "library"
        },
        {
            "name": "psr/log",
            "version": "3.0.0",
            "type": "library"
        },
        {
            "name": "acme/meta",
            "version": "1.0.0",
            "type": "metapackage"
        }
    ],
    "dev": true
}
"#;

/// Files of the fixture project, relative to its root
pub const HYPERF_PROJECT: &[(&str, &str)] = &[
    ("composer.json", COMPOSER_JSON),
    ("bin/hyperf.php", ENTRY_POINT),
    ("config/config.php", CONFIG_PHP),
    ("config/autoload/server.php", "<?php\n\nreturn ['mode' => 'process'];\n"),
    ("app/Controller/IndexController.php", "<?php\n\nnamespace App\\Controller;\n\nclass IndexController\n{\n}\n"),
    (".env", "APP_NAME=shop\n"),
    (".gitignore", "/vendor/\n"),
    ("composer.phar", "composer binary"),
    ("runtime/hyperf.pid", "1234"),
    ("runtime/logs/hyperf.log", "log line\n"),
    ("runtime/container/proxy/App_Controller_IndexController.proxy.php", "<?php\n"),
    ("vendor/autoload.php", "<?php\n\nreturn ComposerAutoloaderInit::getLoader();\n"),
    ("vendor/composer/autoload_real.php", "<?php\n\nclass ComposerAutoloaderInit {}\n"),
    ("vendor/composer/autoload_static.php", "<?php\n"),
    ("vendor/composer/installed.json", INSTALLED_JSON),
    ("vendor/composer/LICENSE", "MIT\n"),
    ("vendor/hyperf/config/composer.json", "{\"name\": \"hyperf/config\"}\n"),
    ("vendor/hyperf/config/src/ConfigFactory.php", CONFIG_FACTORY_PHP),
    ("vendor/hyperf/config/src/Config.php", "<?php\n\nnamespace Hyperf\\Config;\n\nclass Config {}\n"),
    ("vendor/psr/log/composer.json", "{\"name\": \"psr/log\"}\n"),
    ("vendor/psr/log/src/LoggerInterface.php", "<?php\n\nnamespace Psr\\Log;\n\ninterface LoggerInterface {}\n"),
    ("vendor/psr/log/.git/HEAD", "ref: refs/heads/main\n"),
];

/// Archive entries every build of the fixture must contain
pub const EXPECTED_ENTRIES: &[&str] = &[
    "composer.json",
    "config/config.php",
    "config/autoload/server.php",
    "app/Controller/IndexController.php",
    "runtime/container/proxy/App_Controller_IndexController.proxy.php",
    "vendor/autoload.php",
    "vendor/composer/autoload_real.php",
    "vendor/composer/autoload_static.php",
    "vendor/composer/installed.json",
    "vendor/hyperf/config/composer.json",
    "vendor/hyperf/config/src/ConfigFactory.php",
    "vendor/hyperf/config/src/Config.php",
    "vendor/psr/log/composer.json",
    "vendor/psr/log/src/LoggerInterface.php",
    "bin/hyperf.php",
];

/// Fixture files that must never be archived
pub const EXCLUDED_ENTRIES: &[&str] = &[
    ".env",
    ".gitignore",
    "composer.phar",
    "runtime/hyperf.pid",
    "runtime/logs/hyperf.log",
    "vendor/composer/LICENSE",
    "vendor/psr/log/.git/HEAD",
];
